//! Domain layer - Core types
//!
//! Contains value objects, level tables, exit codes, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod exit;
pub mod level;

// Re-export common types
pub use config::RunnerConfig;
pub use error::*;
pub use exit::{Sentinel, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use level::{level_for, LevelName, LEVEL_CHOICES, LOG_LEVELS};
