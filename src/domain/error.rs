//! Domain error types

use thiserror::Error;

/// Boxed error used at operation seams
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level interruption (Ctrl+C) raised inside or around `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("Interrupted")]
pub struct Interrupted;

/// Error when an unknown level name is looked up
#[derive(Debug, Clone, Error)]
#[error("Invalid log level: \"{input}\". Valid levels are: debug, info, warn, error")]
pub struct InvalidLevelError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),
}

/// Errors raised by the runner itself
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("Failed to create tempdir: {0}")]
    Tempdir(#[source] std::io::Error),

    #[error("Failed to remove tempdir: {0}")]
    TempdirCleanup(#[source] std::io::Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Tool `{0}` does not define a `run` operation")]
    MissingRun(String),

    /// Unhandled error from the tool's `run`
    #[error("{0}")]
    Run(BoxError),
}
