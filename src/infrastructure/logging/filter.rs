//! Channel filters
//!
//! [`AppLogFilter`] keeps only the application logger's records and
//! [`RootLogFilter`] keeps everything else. For the same app logger they are
//! exact complements, so a record never shows up on both channels.

use std::fmt;
use std::sync::Arc;

use super::logger::Logger;
use super::record::Record;

/// Decides whether a handler emits a record
pub trait LogFilter: Send + Sync + fmt::Debug {
    fn filter(&self, record: &dyn Record) -> bool;
}

/// Shared state of the channel filters: the application logger's name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLogFilter {
    app_logger: Arc<str>,
}

impl BaseLogFilter {
    pub fn new(app_logger: &Logger) -> Self {
        Self {
            app_logger: app_logger.shared_name(),
        }
    }

    /// Name of the application logger
    pub fn app_logger(&self) -> &str {
        &self.app_logger
    }

    fn is_app_record(&self, record: &dyn Record) -> bool {
        record.logger_name() == &*self.app_logger
    }
}

/// Passes only records from the application logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLogFilter {
    base: BaseLogFilter,
}

impl AppLogFilter {
    pub fn new(app_logger: &Logger) -> Self {
        Self {
            base: BaseLogFilter::new(app_logger),
        }
    }

    pub fn base(&self) -> &BaseLogFilter {
        &self.base
    }
}

impl LogFilter for AppLogFilter {
    fn filter(&self, record: &dyn Record) -> bool {
        self.base.is_app_record(record)
    }
}

/// Passes every record except the application logger's
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLogFilter {
    base: BaseLogFilter,
}

impl RootLogFilter {
    pub fn new(app_logger: &Logger) -> Self {
        Self {
            base: BaseLogFilter::new(app_logger),
        }
    }

    pub fn base(&self) -> &BaseLogFilter {
        &self.base
    }
}

impl LogFilter for RootLogFilter {
    fn filter(&self, record: &dyn Record) -> bool {
        !self.base.is_app_record(record)
    }
}
