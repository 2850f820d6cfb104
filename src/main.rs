//! `scratch`: a small demo tool built on the runner
//!
//! Writes the leftover arguments into a note in a tempdir and reports on
//! both log channels. The note's path goes to stdout at `--log-level info`
//! or lower. `--fail` triggers a handled failure (exit code 1).

use std::fs;
use std::process::ExitCode;

use async_trait::async_trait;
use clap::{Arg, ArgAction, Command};
use colored::Colorize;
use thiserror::Error;

use tool_runner::application::wrap::{catches, cleansup, operation, BoxFuture, ErrorKinds};
use tool_runner::cli::{RunOperation, Runner, Tool};
use tool_runner::domain::{BoxError, RunnerError, EXIT_ERROR};

#[derive(Debug, Error)]
enum ScratchError {
    #[error("Failure requested with --fail")]
    Requested,

    #[error("Failed to write note: {0}")]
    Note(#[from] std::io::Error),
}

struct Scratch;

fn scratch(runner: &mut Runner<Scratch>, _: ()) -> BoxFuture<'_, Result<u8, BoxError>> {
    Box::pin(async move {
        let log = runner.log();
        log.info(format!("Running in {}", runner.path().display()));

        let extra = runner.extra_args()?.to_vec();
        log.debug(format!("Leftover arguments: {:?}", extra));

        let note = runner.tempdir()?.join("note.txt");
        fs::write(&note, extra.join("\n")).map_err(ScratchError::from)?;
        tracing::info!(target: "scratch::note", "wrote {}", note.display());
        runner.stdout().info(note.display());

        if runner.args()?.get_flag("fail") {
            return Err(ScratchError::Requested.into());
        }

        runner.log().success("Done");
        Ok(0)
    })
}

#[async_trait]
impl Tool for Scratch {
    type Output = u8;

    fn name(&self) -> &str {
        "scratch"
    }

    fn add_arguments(&self, command: Command) -> Command {
        command.about("Write leftover arguments to a scratch note").arg(
            Arg::new("fail")
                .long("fail")
                .action(ArgAction::SetTrue)
                .help("Fail with a handled error after writing the note"),
        )
    }

    fn run(&self) -> Option<RunOperation<Self>> {
        let run = cleansup(operation::<_, u8>(scratch));
        Some(Box::new(catches(ErrorKinds::of::<ScratchError>()).wrap(run)))
    }
}

fn main() -> ExitCode {
    let result = Runner::new(Scratch, std::env::args().skip(1)).and_then(|mut runner| runner.call());

    match result {
        Ok(code) => ExitCode::from(code),
        Err(RunnerError::Args(err)) => err.exit(),
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
