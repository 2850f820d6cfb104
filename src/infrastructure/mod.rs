//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the logging
//! registry and its handlers, and the XDG config store.

pub mod config;
pub mod logging;

// Re-export adapters
pub use config::XdgConfigStore;
pub use logging::{Handler, LogRegistry, Logger, RootLogger};
