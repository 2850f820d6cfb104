//! Configuration port interface

use crate::domain::config::RunnerConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage
///
/// Synchronous: config is read before the runner starts its runtime.
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage.
    ///
    /// # Returns
    /// The loaded config (all fields None if the file doesn't exist)
    fn load(&self) -> Result<RunnerConfig, ConfigError>;

    /// Check if configuration file exists.
    fn exists(&self) -> bool;
}
