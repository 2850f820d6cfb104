//! Logging port interface

/// Port for a leveled application log
///
/// Implemented by the registry-backed `Logger`; tests substitute a recorder.
pub trait Log: Send + Sync {
    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warning(&self, message: &str);

    fn error(&self, message: &str);
}

/// Targets that expose an application log (required by `catches`)
pub trait HasLog {
    fn log(&self) -> &dyn Log;
}
