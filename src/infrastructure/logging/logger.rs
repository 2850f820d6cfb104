//! Named loggers and the root logger

use std::fmt;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::application::ports::Log;

use super::handler::Handler;
use super::record::{LogRecord, Severity};
use super::registry::LogRegistry;

/// Handle to a named logger in a [`LogRegistry`]
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    registry: Arc<LogRegistry>,
}

impl Logger {
    pub(super) fn new(name: Arc<str>, registry: Arc<LogRegistry>) -> Self {
        Self { name, registry }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn registry(&self) -> &Arc<LogRegistry> {
        &self.registry
    }

    /// Own level, if set
    pub fn level(&self) -> Option<LevelFilter> {
        self.registry.logger_level(&self.name)
    }

    pub fn set_level(&self, level: LevelFilter) {
        self.registry.set_logger_level(&self.name, level);
    }

    pub fn effective_level(&self) -> LevelFilter {
        self.registry.effective_level(&self.name)
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level <= self.effective_level()
    }

    pub fn propagates(&self) -> bool {
        self.registry.propagates(&self.name)
    }

    /// Whether records also reach the root handlers
    pub fn set_propagate(&self, propagate: bool) {
        self.registry.set_propagate(&self.name, propagate);
    }

    pub fn handlers(&self) -> Vec<Handler> {
        self.registry.logger_handlers(&self.name)
    }

    pub fn add_handler(&self, handler: Handler) {
        self.registry.add_logger_handler(&self.name, handler);
    }

    pub fn remove_handler(&self, handler: &Handler) -> bool {
        self.registry.remove_logger_handler(&self.name, handler)
    }

    pub fn log(&self, severity: Severity, message: impl fmt::Display) {
        if !self.is_enabled_for(severity.level()) {
            return;
        }
        let record = LogRecord::with_severity(&*self.name, severity, message.to_string());
        self.registry.dispatch(&record);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Severity::Info, message);
    }

    pub fn notice(&self, message: impl fmt::Display) {
        self.log(Severity::Notice, message);
    }

    pub fn success(&self, message: impl fmt::Display) {
        self.log(Severity::Success, message);
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Severity::Error, message);
    }

    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Severity::Critical, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}

impl Log for Logger {
    fn debug(&self, message: &str) {
        Logger::debug(self, message);
    }

    fn info(&self, message: &str) {
        Logger::info(self, message);
    }

    fn warning(&self, message: &str) {
        Logger::warning(self, message);
    }

    fn error(&self, message: &str) {
        Logger::error(self, message);
    }
}

/// Handle to the root logger of a [`LogRegistry`]
#[derive(Clone)]
pub struct RootLogger {
    registry: Arc<LogRegistry>,
}

impl RootLogger {
    pub(super) fn new(registry: Arc<LogRegistry>) -> Self {
        Self { registry }
    }

    pub fn level(&self) -> LevelFilter {
        self.registry.root_level()
    }

    pub fn set_level(&self, level: LevelFilter) {
        self.registry.set_root_level(level);
    }

    pub fn handlers(&self) -> Vec<Handler> {
        self.registry.root_handlers()
    }

    pub fn add_handler(&self, handler: Handler) {
        self.registry.add_root_handler(handler);
    }

    pub fn remove_handler(&self, handler: &Handler) -> bool {
        self.registry.remove_root_handler(handler)
    }
}

impl fmt::Debug for RootLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootLogger")
            .field("level", &self.level())
            .field("handlers", &self.handlers().len())
            .finish()
    }
}
