//! Log handlers: level + filters + formatter + sink

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};

use super::filter::LogFilter;
use super::format::Formatter;
use super::record::LogRecord;

/// In-memory sink, mostly for tests
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    fn push(&self, line: String) {
        self.lines.lock().push(line);
    }
}

/// Where a handler writes formatted lines
#[derive(Clone)]
pub enum Sink {
    Stderr,
    Stdout,
    Memory(MemorySink),
    /// Any writer the `tracing_subscriber` fmt layer accepts
    Writer(Arc<BoxMakeWriter>),
}

impl Sink {
    pub fn writer<M>(make_writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::Writer(Arc::new(BoxMakeWriter::new(make_writer)))
    }

    fn write_line(&self, line: String) {
        // Write failures are dropped
        let _ = match self {
            Self::Stderr => writeln!(io::stderr.make_writer(), "{}", line),
            Self::Stdout => writeln!(io::stdout.make_writer(), "{}", line),
            Self::Writer(make_writer) => writeln!(make_writer.make_writer(), "{}", line),
            Self::Memory(sink) => {
                sink.push(line);
                Ok(())
            }
        };
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stderr => f.write_str("Stderr"),
            Self::Stdout => f.write_str("Stdout"),
            Self::Memory(sink) => f.debug_tuple("Memory").field(sink).finish(),
            Self::Writer(_) => f.write_str("Writer"),
        }
    }
}

struct HandlerState {
    level: LevelFilter,
    filters: Vec<Arc<dyn LogFilter>>,
    formatter: Formatter,
    sink: Sink,
}

/// Shared handle to a handler.
///
/// Clones refer to the same handler, so a filter attached through one
/// clone applies everywhere the handler is registered.
#[derive(Clone)]
pub struct Handler {
    state: Arc<RwLock<HandlerState>>,
}

impl Handler {
    /// Handler passing every level, printing the bare message
    pub fn new(sink: Sink) -> Self {
        Self {
            state: Arc::new(RwLock::new(HandlerState {
                level: LevelFilter::TRACE,
                filters: Vec::new(),
                formatter: Formatter::default(),
                sink,
            })),
        }
    }

    pub fn stderr() -> Self {
        Self::new(Sink::Stderr)
    }

    pub fn stdout() -> Self {
        Self::new(Sink::Stdout)
    }

    pub fn with_formatter(self, formatter: Formatter) -> Self {
        self.set_formatter(formatter);
        self
    }

    pub fn with_level(self, level: LevelFilter) -> Self {
        self.set_level(level);
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.state.read().level
    }

    pub fn set_level(&self, level: LevelFilter) {
        self.state.write().level = level;
    }

    pub fn set_formatter(&self, formatter: Formatter) {
        self.state.write().formatter = formatter;
    }

    pub fn formatter(&self) -> Formatter {
        self.state.read().formatter.clone()
    }

    /// Attach a filter; the returned handle detaches it again
    pub fn add_filter(&self, filter: impl LogFilter + 'static) -> Arc<dyn LogFilter> {
        let filter: Arc<dyn LogFilter> = Arc::new(filter);
        self.state.write().filters.push(Arc::clone(&filter));
        filter
    }

    /// Detach a filter previously returned by [`Handler::add_filter`]
    pub fn remove_filter(&self, filter: &Arc<dyn LogFilter>) -> bool {
        let mut state = self.state.write();
        let before = state.filters.len();
        state.filters.retain(|f| !Arc::ptr_eq(f, filter));
        state.filters.len() != before
    }

    pub fn filters(&self) -> Vec<Arc<dyn LogFilter>> {
        self.state.read().filters.clone()
    }

    /// Level and every filter pass
    pub fn accepts(&self, record: &LogRecord) -> bool {
        let state = self.state.read();
        record.level <= state.level && state.filters.iter().all(|f| f.filter(record))
    }

    /// Format and write the record if accepted
    pub fn handle(&self, record: &LogRecord) -> bool {
        if !self.accepts(record) {
            return false;
        }
        let (line, sink) = {
            let state = self.state.read();
            (state.formatter.format(record), state.sink.clone())
        };
        sink.write_line(line);
        true
    }

    /// Same underlying handler
    pub fn same(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Handler")
            .field("level", &state.level)
            .field("filters", &state.filters)
            .field("format", &state.formatter.log_format().as_str())
            .field("sink", &state.sink)
            .finish()
    }
}
