//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod cleanup;
pub mod config;
pub mod log;

// Re-export common types
pub use cleanup::Cleanup;
pub use config::ConfigStore;
pub use log::{HasLog, Log};
