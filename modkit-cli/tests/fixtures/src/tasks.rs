use crate::severity::Severity;

/// A single rollout step.
#[object_type]
pub struct Task {
    #[field]
    pub name: String,

    #[field]
    pub severity: Severity,
}

impl Task {
    pub fn create(name: String, severity: Option<Severity>) -> Self {
        unimplemented!()
    }

    #[function(cache = "session")]
    pub fn describe(&self) -> String {
        unimplemented!()
    }
}

/// Anything that can receive rollout notifications.
#[interface]
pub struct Notifier {}

impl Notifier {
    #[function]
    pub async fn notify(&self, message: String) -> bool {
        unimplemented!()
    }
}

// Not exposed: no class marker.
pub struct Internal {
    pub scratch: Vec<u8>,
}
