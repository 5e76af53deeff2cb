/// How loudly a rollout failure is reported.
#[enum_type]
pub enum Severity {
    /// Log only.
    Info,
    #[value("WARN")]
    Warning,
    /// Page the on-call engineer.
    Critical,
}
