//! Forwards `tracing` events into a [`LogRegistry`]
//!
//! Libraries that log through `tracing` show up as records whose logger name
//! is the event target, so they land on the root channel like any other
//! foreign logger.

use std::fmt::{self, Write};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::record::LogRecord;
use super::registry::LogRegistry;

/// Layer dispatching every event through a registry
pub struct RegistryLayer {
    registry: Arc<LogRegistry>,
}

impl RegistryLayer {
    pub fn new(registry: Arc<LogRegistry>) -> Self {
        Self { registry }
    }
}

impl<S: Subscriber> Layer<S> for RegistryLayer {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        // Levels change at runtime, so never let tracing cache a verdict
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.registry.is_enabled(metadata, *metadata.level())
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let record = LogRecord::new(metadata.target(), *metadata.level(), visitor.finish());
        self.registry.dispatch(&record);
    }
}

/// Collects the `message` field plus any other fields as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={:?}", field.name(), value);
    }
}
