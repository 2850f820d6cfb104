//! Runner lifecycle tests

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing_subscriber::layer::SubscriberExt;

use tool_runner::application::wrap::{catches, cleansup, operation, BoxFuture, ErrorKinds};
use tool_runner::cli::{RunOperation, Runner, RunnerOptions, Tool, TEMPDIR_WARNING};
use tool_runner::domain::{BoxError, Interrupted, RunnerConfig, RunnerError};
use tool_runner::infrastructure::logging::{LogRegistry, MemorySink, RegistryLayer, Sink};

/// Error whose `Display` is empty
#[derive(Debug)]
struct CustomError;

impl fmt::Display for CustomError {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl std::error::Error for CustomError {}

#[derive(Debug)]
struct Unhandled(&'static str);

impl fmt::Display for Unhandled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for Unhandled {}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Succeed,
    Custom,
    Unhandled,
    Interrupt,
    Hang,
}

#[derive(Debug, Clone, Copy)]
enum Wrap {
    Bare,
    Catches,
    Cleansup,
    CatchesOverCleansup,
    CleansupOverCatches,
}

#[derive(Default)]
struct Observed {
    cleanups: AtomicUsize,
    reached_end: AtomicBool,
    tempdir: Mutex<Option<PathBuf>>,
    /// Stands in for Ctrl-C
    interrupt: Notify,
    /// First cleanup raises the interrupt and never finishes
    stall_cleanup: AtomicBool,
}

struct Fixture {
    outcome: Outcome,
    wrap: Wrap,
    seen: Arc<Observed>,
}

fn fixture(runner: &mut Runner<Fixture>, _: ()) -> BoxFuture<'_, Result<u8, BoxError>> {
    Box::pin(async move {
        let tempdir = runner.tempdir()?.to_path_buf();
        *runner.tool().seen.tempdir.lock().unwrap() = Some(tempdir);

        match runner.tool().outcome {
            Outcome::Succeed => {}
            Outcome::Custom => return Err(CustomError.into()),
            Outcome::Unhandled => return Err(Unhandled("disk on fire").into()),
            Outcome::Interrupt => return Err(Interrupted.into()),
            Outcome::Hang => std::future::pending::<()>().await,
        }

        runner.tool().seen.reached_end.store(true, Ordering::SeqCst);
        Ok(0)
    })
}

#[async_trait]
impl Tool for Fixture {
    type Output = u8;

    fn name(&self) -> &str {
        "fixture"
    }

    fn run(&self) -> Option<RunOperation<Self>> {
        let kinds = ErrorKinds::of::<CustomError>();
        let run: RunOperation<Self> = match self.wrap {
            Wrap::Bare => Box::new(operation::<_, u8>(fixture)),
            Wrap::Catches => Box::new(catches(kinds).wrap(operation::<_, u8>(fixture))),
            Wrap::Cleansup => Box::new(cleansup(operation::<_, u8>(fixture))),
            Wrap::CatchesOverCleansup => {
                Box::new(catches(kinds).wrap(cleansup(operation::<_, u8>(fixture))))
            }
            Wrap::CleansupOverCatches => {
                Box::new(cleansup(catches(kinds).wrap(operation::<_, u8>(fixture))))
            }
        };
        Some(run)
    }

    async fn cleanup(&mut self) -> Result<(), BoxError> {
        let first = self.seen.cleanups.fetch_add(1, Ordering::SeqCst) == 0;
        if first && self.seen.stall_cleanup.load(Ordering::SeqCst) {
            self.seen.interrupt.notify_one();
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

struct Sinks {
    log: MemorySink,
    stdout: MemorySink,
    root: MemorySink,
}

fn setup(outcome: Outcome, wrap: Wrap, args: &[&str]) -> (Runner<Fixture>, Arc<Observed>, Sinks) {
    let seen = Arc::new(Observed::default());
    let sinks = Sinks {
        log: MemorySink::new(),
        stdout: MemorySink::new(),
        root: MemorySink::new(),
    };
    let config = RunnerConfig {
        color: Some(false),
        ..RunnerConfig::defaults()
    };
    let options = RunnerOptions::new(config)
        .with_registry(Arc::new(LogRegistry::new()))
        .with_log_sink(Sink::Memory(sinks.log.clone()))
        .with_stdout_sink(Sink::Memory(sinks.stdout.clone()))
        .with_root_sink(Sink::Memory(sinks.root.clone()));
    let tool = Fixture {
        outcome,
        wrap,
        seen: Arc::clone(&seen),
    };

    let runner = Runner::with_options(tool, args.iter().copied(), options).unwrap();
    (runner, seen, sinks)
}

fn tempdir_of(seen: &Observed) -> PathBuf {
    seen.tempdir.lock().unwrap().clone().unwrap()
}

/// Call the runner with the shared notifier as its interrupt
fn call_interruptible(runner: &mut Runner<Fixture>, seen: &Arc<Observed>) -> u8 {
    let seen = Arc::clone(seen);
    runner
        .call_until(async move { seen.interrupt.notified().await })
        .unwrap()
}

#[test]
fn handled_error_with_empty_display_logs_debug_form() {
    let (mut runner, seen, sinks) = setup(Outcome::Custom, Wrap::CatchesOverCleansup, &[]);

    assert_eq!(runner.call().unwrap(), 1);
    assert_eq!(sinks.log.lines(), vec!["fixture ERROR CustomError"]);
    assert!(!seen.reached_end.load(Ordering::SeqCst));
}

#[test]
fn interrupted_run_returns_sentinel() {
    let (mut runner, seen, _sinks) = setup(Outcome::Interrupt, Wrap::Bare, &[]);

    assert_eq!(runner.call().unwrap(), 1);
    assert!(!seen.reached_end.load(Ordering::SeqCst));
}

#[test]
fn interrupt_runs_cleanup_of_guarded_run_once() {
    let (mut runner, seen, _sinks) = setup(Outcome::Hang, Wrap::Cleansup, &[]);
    seen.interrupt.notify_one();

    assert_eq!(call_interruptible(&mut runner, &seen), 1);
    assert!(!seen.reached_end.load(Ordering::SeqCst));
    assert_eq!(seen.cleanups.load(Ordering::SeqCst), 1);
    assert!(!runner.has_tempdir());
}

#[test]
fn interrupt_skips_cleanup_of_unguarded_run() {
    let (mut runner, seen, _sinks) = setup(Outcome::Hang, Wrap::Catches, &[]);
    seen.interrupt.notify_one();

    assert_eq!(call_interruptible(&mut runner, &seen), 1);
    assert_eq!(seen.cleanups.load(Ordering::SeqCst), 0);
}

#[test]
fn interrupt_during_cleanup_does_not_repeat_it() {
    let (mut runner, seen, sinks) = setup(Outcome::Succeed, Wrap::Cleansup, &[]);
    seen.stall_cleanup.store(true, Ordering::SeqCst);

    assert_eq!(call_interruptible(&mut runner, &seen), 1);
    assert!(seen.reached_end.load(Ordering::SeqCst));
    assert_eq!(seen.cleanups.load(Ordering::SeqCst), 1);
    assert!(!tempdir_of(&seen).exists());
    assert!(!runner.has_tempdir());
    assert!(sinks.log.lines().is_empty());
}

#[test]
fn default_flags_parse_to_defaults() {
    let (runner, _seen, _sinks) = setup(Outcome::Succeed, Wrap::Cleansup, &[]);
    let args = runner.args().unwrap();

    assert_eq!(args.get_one::<String>("verbosity").unwrap(), "info");
    assert_eq!(args.get_one::<String>("log_level").unwrap(), "warn");
    assert!(runner.extra_args().unwrap().is_empty());
}

#[test]
fn parsed_args_are_memoized() {
    let (runner, _seen, _sinks) = setup(Outcome::Succeed, Wrap::Cleansup, &["--x", "y"]);

    assert!(std::ptr::eq(runner.args().unwrap(), runner.args().unwrap()));
    assert!(std::ptr::eq(runner.extra_args().unwrap(), runner.extra_args().unwrap()));
    assert!(std::ptr::eq(runner.parser(), runner.parser()));
    assert_eq!(runner.extra_args().unwrap(), ["--x", "y"]);
}

#[test]
fn unclassified_errors_propagate_after_cleanup() {
    let (mut runner, seen, sinks) = setup(Outcome::Unhandled, Wrap::CatchesOverCleansup, &[]);

    let err = runner.call().unwrap_err();
    assert!(matches!(err, RunnerError::Run(_)));
    assert_eq!(err.to_string(), "disk on fire");
    assert_eq!(seen.cleanups.load(Ordering::SeqCst), 1);
    assert!(!tempdir_of(&seen).exists());
    assert!(sinks.log.lines().is_empty());
}

#[test]
fn cleansup_runs_cleanup_once_on_success() {
    let (mut runner, seen, _sinks) = setup(Outcome::Succeed, Wrap::Cleansup, &[]);

    assert_eq!(runner.call().unwrap(), 0);
    assert!(seen.reached_end.load(Ordering::SeqCst));
    assert_eq!(seen.cleanups.load(Ordering::SeqCst), 1);
    assert!(!tempdir_of(&seen).exists());
    assert!(!runner.has_tempdir());
}

#[test]
fn cleanup_runs_in_either_stacking_order() {
    for wrap in [Wrap::CatchesOverCleansup, Wrap::CleansupOverCatches] {
        let (mut runner, seen, sinks) = setup(Outcome::Custom, wrap, &[]);

        assert!(!runner.missing_cleanup(), "{:?}", wrap);
        assert_eq!(runner.call().unwrap(), 1, "{:?}", wrap);
        assert_eq!(seen.cleanups.load(Ordering::SeqCst), 1, "{:?}", wrap);
        assert!(!tempdir_of(&seen).exists(), "{:?}", wrap);
        assert_eq!(sinks.log.lines().len(), 1, "{:?}", wrap);
    }
}

#[test]
fn run_without_cleansup_warns_about_tempdir() {
    for wrap in [Wrap::Bare, Wrap::Catches] {
        let (mut runner, seen, sinks) = setup(Outcome::Succeed, wrap, &[]);

        assert!(runner.missing_cleanup());
        assert_eq!(runner.call().unwrap(), 0);
        assert_eq!(seen.cleanups.load(Ordering::SeqCst), 0);
        assert!(tempdir_of(&seen).exists());
        assert_eq!(
            sinks.log.lines(),
            vec![format!("fixture WARNING {}", TEMPDIR_WARNING)]
        );
    }
}

#[test]
fn channels_are_exclusive() {
    let (runner, _seen, sinks) = setup(Outcome::Succeed, Wrap::Cleansup, &["-l", "info"]);

    runner.log().info("from the tool");
    runner.registry().logger("hyper").info("from a library");
    runner.stdout().info("plain output");

    assert_eq!(sinks.log.lines(), vec!["fixture INFO from the tool"]);
    assert_eq!(
        sinks.root.lines(),
        vec!["hyper: INFO from a library", "stdout: INFO plain output"]
    );
    assert_eq!(sinks.stdout.lines(), vec!["plain output"]);
}

#[test]
fn stdout_follows_log_level_not_verbosity() {
    let (runner, _seen, sinks) = setup(Outcome::Succeed, Wrap::Cleansup, &["-v", "debug"]);

    runner.stdout().info("hidden");
    runner.stdout().warning("shown");

    assert_eq!(sinks.stdout.lines(), vec!["shown"]);
    assert_eq!(sinks.root.lines(), vec!["stdout: WARNING shown"]);
    assert!(sinks.log.lines().is_empty());
}

#[test]
fn levels_gate_each_channel() {
    let (runner, _seen, sinks) = setup(Outcome::Succeed, Wrap::Cleansup, &["-v", "error"]);

    runner.log().warning("quiet tool");
    runner.registry().logger("hyper").info("quiet library");
    runner.registry().logger("hyper").warning("loud library");

    assert!(sinks.log.lines().is_empty());
    assert_eq!(sinks.root.lines(), vec!["hyper: WARNING loud library"]);
}

#[test]
fn tracing_events_are_routed_by_target() {
    let (runner, _seen, sinks) = setup(Outcome::Succeed, Wrap::Cleansup, &[]);
    let subscriber =
        tracing_subscriber::registry().with(RegistryLayer::new(Arc::clone(runner.registry())));

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(target: "hyper::client", "connection reset");
        tracing::warn!(target: "fixture", "looks like the tool");
    });

    assert_eq!(
        sinks.root.lines(),
        vec!["hyper::client: WARNING connection reset"]
    );
    assert_eq!(sinks.log.lines(), vec!["fixture WARNING looks like the tool"]);
}

#[test]
fn tool_cleanup_hook_does_not_skip_tempdir_teardown() {
    let (mut runner, seen, _sinks) = setup(Outcome::Succeed, Wrap::Bare, &[]);

    assert_eq!(runner.call().unwrap(), 0);
    let tempdir = tempdir_of(&seen);
    assert!(tempdir.exists());

    runner.cleanup_tempdir().unwrap();
    assert!(!tempdir.exists());
    runner.cleanup_tempdir().unwrap();
}
