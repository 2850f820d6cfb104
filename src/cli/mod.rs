//! CLI layer - Tools and the runner that drives them
//!
//! Contains argument parsing, config loading, the `Tool` trait and the
//! `Runner` lifecycle.

pub mod app;
pub mod args;
pub mod runner;
pub mod tool;

// Re-export commonly used types
pub use app::load_merged_config;
pub use args::{add_default_arguments, base_command, parse_known_args};
pub use runner::{Runner, RunnerOptions, STDOUT_LOGGER, TEMPDIR_WARNING};
pub use tool::{RunOperation, Tool};
