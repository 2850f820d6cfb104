//! Logging adapters
//!
//! A small registry of named loggers with leveled handlers, filters and
//! formatters. Events emitted through `tracing` are bridged into the
//! same registry.

mod bridge;
mod filter;
mod format;
mod handler;
mod logger;
mod record;
mod registry;

pub use bridge::RegistryLayer;
pub use filter::{AppLogFilter, BaseLogFilter, LogFilter, RootLogFilter};
pub use format::{
    FieldStyles, Formatter, LevelStyles, LogFormat, Style, LOG_FIELD_STYLES, LOG_LEVEL_STYLES,
};
pub use handler::{Handler, MemorySink, Sink};
pub use logger::{Logger, RootLogger};
pub use record::{level_name, LogRecord, Record, Severity};
pub use registry::LogRegistry;
