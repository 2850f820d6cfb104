//! Process-wide logging registry
//!
//! Holds the root logger and every named logger. A record goes to its
//! logger's handlers and, while the logger propagates, to the root handlers.
//! Levels are checked against the originating logger only (falling back to
//! the root level when the logger has none).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::config::BASIC_LOG_FMT;

use super::bridge::RegistryLayer;
use super::format::Formatter;
use super::handler::Handler;
use super::logger::{Logger, RootLogger};
use super::record::{LogRecord, Record};

struct LoggerState {
    level: Option<LevelFilter>,
    propagate: bool,
    handlers: Vec<Handler>,
}

impl Default for LoggerState {
    fn default() -> Self {
        Self {
            level: None,
            propagate: true,
            handlers: Vec::new(),
        }
    }
}

struct RootState {
    level: LevelFilter,
    handlers: Vec<Handler>,
}

struct RegistryState {
    root: RootState,
    loggers: HashMap<String, LoggerState>,
}

/// Shared logging configuration
pub struct LogRegistry {
    state: RwLock<RegistryState>,
}

static GLOBAL: OnceLock<Arc<LogRegistry>> = OnceLock::new();

impl LogRegistry {
    /// Empty registry: no handlers, root level WARN
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                root: RootState {
                    level: LevelFilter::WARN,
                    handlers: Vec::new(),
                },
                loggers: HashMap::new(),
            }),
        }
    }

    /// The process-wide registry.
    ///
    /// The first call also installs a global `tracing` subscriber that
    /// forwards every event into this registry. If another subscriber is
    /// already installed, events from `tracing` are not forwarded.
    pub fn global() -> Arc<Self> {
        let registry = GLOBAL.get_or_init(|| {
            let registry = Arc::new(Self::new());
            let _ = tracing_subscriber::registry()
                .with(RegistryLayer::new(Arc::clone(&registry)))
                .try_init();
            registry
        });
        Arc::clone(registry)
    }

    pub fn root(self: &Arc<Self>) -> RootLogger {
        RootLogger::new(Arc::clone(self))
    }

    /// Get or create the named logger
    pub fn logger(self: &Arc<Self>, name: &str) -> Logger {
        self.state
            .write()
            .loggers
            .entry(name.to_string())
            .or_default();
        Logger::new(Arc::from(name), Arc::clone(self))
    }

    /// Give the root logger a stderr handler if it has none, and set its level.
    /// Safe to call repeatedly.
    pub fn basic_config(&self, level: LevelFilter) {
        let mut state = self.state.write();
        if state.root.handlers.is_empty() {
            state
                .root
                .handlers
                .push(Handler::stderr().with_formatter(Formatter::plain(BASIC_LOG_FMT)));
        }
        state.root.level = level;
    }

    /// Level a record from `name` must meet
    pub fn effective_level(&self, name: &str) -> LevelFilter {
        let state = self.state.read();
        state
            .loggers
            .get(name)
            .and_then(|logger| logger.level)
            .unwrap_or(state.root.level)
    }

    pub fn is_enabled(&self, record: &dyn Record, level: Level) -> bool {
        level <= self.effective_level(record.logger_name())
    }

    /// Route a record to its handlers; returns how many emitted it
    pub fn dispatch(&self, record: &LogRecord) -> usize {
        let handlers = {
            let state = self.state.read();
            let logger = state.loggers.get(record.name.as_str());
            let threshold = logger
                .and_then(|logger| logger.level)
                .unwrap_or(state.root.level);
            if record.level > threshold {
                return 0;
            }

            let mut handlers = Vec::new();
            let propagate = match logger {
                Some(logger) => {
                    handlers.extend(logger.handlers.iter().cloned());
                    logger.propagate
                }
                None => true,
            };
            if propagate {
                handlers.extend(state.root.handlers.iter().cloned());
            }
            handlers
        };

        let mut emitted = 0;
        for handler in &handlers {
            if handler.handle(record) {
                emitted += 1;
            }
        }
        emitted
    }

    pub(crate) fn root_level(&self) -> LevelFilter {
        self.state.read().root.level
    }

    pub(crate) fn set_root_level(&self, level: LevelFilter) {
        self.state.write().root.level = level;
    }

    pub(crate) fn root_handlers(&self) -> Vec<Handler> {
        self.state.read().root.handlers.clone()
    }

    pub(crate) fn add_root_handler(&self, handler: Handler) {
        self.state.write().root.handlers.push(handler);
    }

    pub(crate) fn remove_root_handler(&self, handler: &Handler) -> bool {
        let mut state = self.state.write();
        let before = state.root.handlers.len();
        state.root.handlers.retain(|h| !h.same(handler));
        state.root.handlers.len() != before
    }

    pub(crate) fn logger_level(&self, name: &str) -> Option<LevelFilter> {
        self.state.read().loggers.get(name).and_then(|l| l.level)
    }

    pub(crate) fn set_logger_level(&self, name: &str, level: LevelFilter) {
        self.state
            .write()
            .loggers
            .entry(name.to_string())
            .or_default()
            .level = Some(level);
    }

    pub(crate) fn propagates(&self, name: &str) -> bool {
        self.state
            .read()
            .loggers
            .get(name)
            .map_or(true, |l| l.propagate)
    }

    pub(crate) fn set_propagate(&self, name: &str, propagate: bool) {
        self.state
            .write()
            .loggers
            .entry(name.to_string())
            .or_default()
            .propagate = propagate;
    }

    pub(crate) fn logger_handlers(&self, name: &str) -> Vec<Handler> {
        self.state
            .read()
            .loggers
            .get(name)
            .map(|l| l.handlers.clone())
            .unwrap_or_default()
    }

    pub(crate) fn add_logger_handler(&self, name: &str, handler: Handler) {
        self.state
            .write()
            .loggers
            .entry(name.to_string())
            .or_default()
            .handlers
            .push(handler);
    }

    pub(crate) fn remove_logger_handler(&self, name: &str, handler: &Handler) -> bool {
        let mut state = self.state.write();
        let Some(logger) = state.loggers.get_mut(name) else {
            return false;
        };
        let before = logger.handlers.len();
        logger.handlers.retain(|h| !h.same(handler));
        logger.handlers.len() != before
    }
}

impl fmt::Debug for LogRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("LogRegistry")
            .field("root_level", &state.root.level)
            .field("root_handlers", &state.root.handlers.len())
            .field("loggers", &state.loggers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}
