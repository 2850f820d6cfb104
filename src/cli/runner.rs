//! Runner: lifecycle, cached state and logging channels for a [`Tool`]

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use clap::{ArgMatches, Command};
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;

use crate::application::ports::{Cleanup, HasLog, Log};
use crate::domain::config::{RunnerConfig, STDOUT_LOG_FMT};
use crate::domain::error::{BoxError, Interrupted, RunnerError};
use crate::domain::level::{level_for, LevelName};
use crate::domain::Sentinel;
use crate::infrastructure::logging::{
    AppLogFilter, FieldStyles, Formatter, Handler, LevelStyles, LogRegistry, Logger,
    RootLogFilter, RootLogger, Sink, LOG_FIELD_STYLES, LOG_LEVEL_STYLES,
};

use super::app::load_merged_config;
use super::args::{add_default_arguments, base_command, parse_known_args, LOG_LEVEL, VERBOSITY};
use super::tool::{RunOperation, Tool};

/// Warning logged when a tempdir is created but nothing guarantees its removal
pub const TEMPDIR_WARNING: &str =
    "Tempdir created but instance has a `run` method which is not decorated with `cleansup`";

/// Name of the message-only stdout logger
pub const STDOUT_LOGGER: &str = "stdout";

/// Construction options; mostly useful to isolate runners in tests
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    pub config: RunnerConfig,
    pub registry: Arc<LogRegistry>,
    /// Sink of the application channel
    pub log_sink: Sink,
    /// Sink of the `stdout` logger
    pub stdout_sink: Sink,
    /// Sink of the root channel handler
    pub root_sink: Sink,
}

impl RunnerOptions {
    /// Global registry, standard streams
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            registry: LogRegistry::global(),
            log_sink: Sink::Stderr,
            stdout_sink: Sink::Stdout,
            root_sink: Sink::Stderr,
        }
    }

    pub fn with_registry(mut self, registry: Arc<LogRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_log_sink(mut self, sink: Sink) -> Self {
        self.log_sink = sink;
        self
    }

    pub fn with_stdout_sink(mut self, sink: Sink) -> Self {
        self.stdout_sink = sink;
        self
    }

    pub fn with_root_sink(mut self, sink: Sink) -> Self {
        self.root_sink = sink;
        self
    }
}

/// Drives one invocation of a tool.
///
/// Everything derived from the arguments or the logging registry is computed
/// on first use and kept for the life of the runner. Only the tempdir is
/// ever dropped again, by [`Runner::cleanup_tempdir`].
pub struct Runner<T: Tool> {
    tool: T,
    raw_args: Vec<String>,
    config: RunnerConfig,
    registry: Arc<LogRegistry>,
    log_sink: Sink,
    stdout_sink: Sink,
    root_sink: Sink,

    parser: OnceLock<Command>,
    known_args: OnceLock<(ArgMatches, Vec<String>)>,
    verbosity: OnceLock<LevelFilter>,
    log_level: OnceLock<LevelFilter>,
    log: OnceLock<Logger>,
    root_log_handler: OnceLock<Handler>,
    root_logger: OnceLock<RootLogger>,
    stdout: OnceLock<Logger>,
    tempdir: OnceLock<TempDir>,
    /// Set once `cleanup` has been entered during the current call
    cleanup_started: bool,
}

impl<T: Tool> Runner<T> {
    /// Runner on the process-wide registry, configured from
    /// defaults, `runner.toml` and the environment
    pub fn new<I, S>(tool: T, args: I) -> Result<Self, RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = load_merged_config(tool.name());
        Self::with_options(tool, args, RunnerOptions::new(config))
    }

    /// Parses the arguments and sets up logging
    pub fn with_options<I, S>(tool: T, args: I, options: RunnerOptions) -> Result<Self, RunnerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(color) = options.config.color {
            colored::control::set_override(color);
        }

        let runner = Self {
            tool,
            raw_args: args.into_iter().map(Into::into).collect(),
            config: options.config,
            registry: options.registry,
            log_sink: options.log_sink,
            stdout_sink: options.stdout_sink,
            root_sink: options.root_sink,
            parser: OnceLock::new(),
            known_args: OnceLock::new(),
            verbosity: OnceLock::new(),
            log_level: OnceLock::new(),
            log: OnceLock::new(),
            root_log_handler: OnceLock::new(),
            root_logger: OnceLock::new(),
            stdout: OnceLock::new(),
            tempdir: OnceLock::new(),
            cleanup_started: false,
        };

        runner.args()?;
        runner.setup_logging();
        Ok(runner)
    }

    /// Run the tool to completion on a single-threaded runtime.
    ///
    /// An [`Interrupted`] error from `run`, or Ctrl-C, yields the failure
    /// sentinel. If Ctrl-C arrives while a `cleansup`-wrapped `run` is in
    /// flight, cleanup still runs before returning.
    pub fn call(&mut self) -> Result<T::Output, RunnerError> {
        self.call_until(async {
            // Without a signal handler only an `Interrupted` error stops the run
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
    }

    /// Like [`Runner::call`], with `interrupt` standing in for Ctrl-C
    pub fn call_until<F>(&mut self, interrupt: F) -> Result<T::Output, RunnerError>
    where
        F: Future<Output = ()>,
    {
        let run = self
            .tool
            .run()
            .ok_or_else(|| RunnerError::MissingRun(self.name().to_string()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RunnerError::Runtime)?;

        match runtime.block_on(self.drive(run, interrupt)) {
            Ok(output) => Ok(output),
            Err(err) if err.is::<Interrupted>() => Ok(T::Output::failure()),
            Err(err) => Err(RunnerError::Run(err)),
        }
    }

    async fn drive<F>(
        &mut self,
        run: RunOperation<T>,
        interrupt: F,
    ) -> Result<T::Output, BoxError>
    where
        F: Future<Output = ()>,
    {
        let guarantees_cleanup = run.metadata().guarantees_cleanup();
        self.cleanup_started = false;

        tokio::select! {
            result = run.call(self, ()) => return result,
            () = interrupt => {}
        }

        if !guarantees_cleanup {
            return Err(Interrupted.into());
        }

        // A cleanup cut short by the interrupt is not started again; only the
        // tempdir is still removed
        let cleaned = if self.cleanup_started {
            self.cleanup_tempdir().map_err(BoxError::from)
        } else {
            self.cleanup().await
        };
        if let Err(err) = cleaned {
            self.log().error(format!("Cleanup after interrupt failed: {}", err));
        }
        Err(Interrupted.into())
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut T {
        &mut self.tool
    }

    pub fn raw_args(&self) -> &[String] {
        &self.raw_args
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<LogRegistry> {
        &self.registry
    }

    pub fn name(&self) -> &str {
        self.tool.name()
    }

    /// Working path of the tool
    pub fn path(&self) -> &Path {
        Path::new(".")
    }

    /// The command: default flags, then the tool's own
    pub fn parser(&self) -> &Command {
        self.parser.get_or_init(|| {
            let command = add_default_arguments(base_command(self.name()), &self.config);
            self.tool.add_arguments(command)
        })
    }

    fn known_args(&self) -> Result<&(ArgMatches, Vec<String>), RunnerError> {
        if let Some(known) = self.known_args.get() {
            return Ok(known);
        }
        let known = parse_known_args(self.parser(), &self.raw_args)?;
        Ok(self.known_args.get_or_init(|| known))
    }

    /// Recognized arguments
    pub fn args(&self) -> Result<&ArgMatches, RunnerError> {
        self.known_args().map(|(matches, _)| matches)
    }

    /// Arguments the parser did not recognize, in order
    pub fn extra_args(&self) -> Result<&[String], RunnerError> {
        self.known_args().map(|(_, extra)| extra.as_slice())
    }

    /// Level of the application logger
    pub fn verbosity(&self) -> LevelFilter {
        *self
            .verbosity
            .get_or_init(|| self.level_arg(VERBOSITY, self.config.verbosity_or_default()))
    }

    /// Level of everything that is not the application logger
    pub fn log_level(&self) -> LevelFilter {
        *self
            .log_level
            .get_or_init(|| self.level_arg(LOG_LEVEL, self.config.log_level_or_default()))
    }

    /// Level named by a parsed flag.
    ///
    /// The constructor refuses arguments that do not parse, and the value
    /// parser only admits names from the level table, so `fallback` is only
    /// reached for a tool that removed the flag.
    fn level_arg(&self, id: &str, fallback: LevelName) -> LevelFilter {
        let Some((matches, _)) = self.known_args.get() else {
            return fallback.level();
        };
        matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .and_then(|name| level_for(name).ok())
            .unwrap_or_else(|| fallback.level())
    }

    pub fn log_fmt(&self) -> &str {
        self.config.log_fmt_or_default()
    }

    pub fn root_log_fmt(&self) -> &str {
        self.config.root_log_fmt_or_default()
    }

    pub fn log_field_styles(&self) -> FieldStyles {
        LOG_FIELD_STYLES
    }

    pub fn log_level_styles(&self) -> LevelStyles {
        LOG_LEVEL_STYLES
    }

    /// Application logger, named after the tool
    pub fn log(&self) -> &Logger {
        self.log.get_or_init(|| {
            let logger = self.registry.logger(self.name());
            logger.set_propagate(false);
            logger.add_handler(Handler::new(self.log_sink.clone()).with_formatter(
                Formatter::colored(
                    self.log_fmt(),
                    self.log_field_styles(),
                    self.log_level_styles(),
                ),
            ));
            logger
        })
    }

    /// Root channel handler: everything but the application logger
    pub fn root_log_handler(&self) -> &Handler {
        self.root_log_handler.get_or_init(|| {
            let handler = Handler::new(self.root_sink.clone())
                .with_level(self.log_level())
                .with_formatter(Formatter::plain(self.root_log_fmt()));
            handler.add_filter(RootLogFilter::new(self.log()));
            handler
        })
    }

    /// Root logger with the channel filters wired in
    pub fn root_logger(&self) -> &RootLogger {
        self.root_logger.get_or_init(|| {
            let root = self.registry.root();
            if let Some(first) = root.handlers().first() {
                first.add_filter(AppLogFilter::new(self.log()));
            }
            root.add_handler(self.root_log_handler().clone());
            root
        })
    }

    /// Message-only logger on standard output, at the non-application level
    pub fn stdout(&self) -> &Logger {
        self.stdout.get_or_init(|| {
            let logger = self.registry.logger(STDOUT_LOGGER);
            logger.set_level(self.log_level());
            logger.add_handler(
                Handler::new(self.stdout_sink.clone())
                    .with_formatter(Formatter::plain(STDOUT_LOG_FMT)),
            );
            logger
        })
    }

    /// Scratch directory, created on first use and removed by cleanup
    pub fn tempdir(&self) -> Result<&Path, RunnerError> {
        if let Some(dir) = self.tempdir.get() {
            return Ok(dir.path());
        }

        let dir = TempDir::new().map_err(RunnerError::Tempdir)?;
        if self.missing_cleanup() {
            self.log().warning(TEMPDIR_WARNING);
        }
        Ok(self.tempdir.get_or_init(|| dir).path())
    }

    /// Whether a tempdir exists right now
    pub fn has_tempdir(&self) -> bool {
        self.tempdir.get().is_some()
    }

    /// Configure levels and wire the channels. Safe to call again.
    pub fn setup_logging(&self) {
        let log_level = self.log_level();
        self.registry.basic_config(log_level);
        self.root_logger().set_level(log_level);
        self.log().set_level(self.verbosity());
    }

    /// True when `run` exists but is not wrapped with `cleansup`
    pub fn missing_cleanup(&self) -> bool {
        self.tool
            .run()
            .is_some_and(|run| !run.metadata().guarantees_cleanup())
    }

    /// Remove the tempdir if one was created
    pub fn cleanup_tempdir(&mut self) -> Result<(), RunnerError> {
        match self.tempdir.take() {
            Some(dir) => dir.close().map_err(RunnerError::TempdirCleanup),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<T: Tool> Cleanup for Runner<T> {
    /// Tool hook first; the tempdir is removed either way
    async fn cleanup(&mut self) -> Result<(), BoxError> {
        self.cleanup_started = true;
        let hook = self.tool.cleanup().await;
        let tempdir = self.cleanup_tempdir().map_err(BoxError::from);
        hook.and(tempdir)
    }
}

impl<T: Tool> HasLog for Runner<T> {
    fn log(&self) -> &dyn Log {
        Runner::log(self)
    }
}

impl<T: Tool> fmt::Debug for Runner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("name", &self.name())
            .field("raw_args", &self.raw_args)
            .field("tempdir", &self.tempdir.get().map(TempDir::path))
            .finish_non_exhaustive()
    }
}
