//! Log records and severities

use tracing::{Level, Metadata};

/// Anything a [`LogFilter`](super::LogFilter) can inspect
pub trait Record {
    /// Name of the logger that produced the record
    fn logger_name(&self) -> &str;
}

/// A single log line before formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Originating logger name (the event target for bridged records)
    pub name: String,
    pub level: Level,
    /// Printed level name, e.g. `WARNING` or `SUCCESS`
    pub level_name: &'static str,
    pub message: String,
}

impl LogRecord {
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            level_name: level_name(level),
            message: message.into(),
        }
    }

    /// Record at a verbose severity, keeping its own level name
    pub fn with_severity(
        name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            level: severity.level(),
            level_name: severity.name(),
            message: message.into(),
        }
    }
}

impl Record for LogRecord {
    fn logger_name(&self) -> &str {
        &self.name
    }
}

impl Record for Metadata<'_> {
    fn logger_name(&self) -> &str {
        self.target()
    }
}

/// Printed name for a plain `tracing` level
pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        _ => "ERROR",
    }
}

/// Severities offered by the application logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    /// Noteworthy but routine
    Notice,
    /// Something finished well
    Success,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Level used for filtering
    pub const fn level(&self) -> Level {
        match self {
            Self::Debug => Level::DEBUG,
            Self::Info | Self::Notice | Self::Success => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }

    /// Printed level name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}
