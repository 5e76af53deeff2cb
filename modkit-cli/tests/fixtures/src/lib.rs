//! A small deployment helper module.

pub mod severity;
pub mod tasks;

#[object_type]
pub struct Deployer {
    /// Target environment name.
    #[field]
    pub environment: String,

    #[field(default = 3)]
    pub replicas: u32,
}

impl Deployer {
    /// Roll out the configured service.
    #[function]
    pub async fn deploy(&self, service: String, dry_run: Option<bool>) -> String {
        unimplemented!()
    }

    #[check]
    pub fn healthy(&self) -> bool {
        unimplemented!()
    }
}
