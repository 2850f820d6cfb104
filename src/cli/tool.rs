//! The trait a concrete command-line tool implements

use std::any::type_name;

use async_trait::async_trait;
use clap::Command;

use crate::application::wrap::Operation;
use crate::domain::{BoxError, Sentinel};

use super::runner::Runner;

/// Boxed `run` operation of a tool
pub type RunOperation<T> = Box<dyn Operation<Runner<T>, (), Output = <T as Tool>::Output>>;

/// A command-line tool driven by a [`Runner`].
///
/// Only `run` is needed in practice; a tool without one cannot be called.
/// Wrap it with `catches` to turn expected failures into exit code `1`, and
/// with `cleansup` so the runner's resources are released on every path.
#[async_trait]
pub trait Tool: Send + Sync + Sized + 'static {
    /// Result of `run`; `1` is reserved for handled failures
    type Output: Sentinel + Send + 'static;

    /// Name used for the command, the application logger and the config dir.
    /// Defaults to the type's name.
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }

    /// Extend the command after the default flags are registered
    fn add_arguments(&self, command: Command) -> Command {
        command
    }

    /// The tool's entry operation
    fn run(&self) -> Option<RunOperation<Self>> {
        None
    }

    /// Tool-specific teardown, called by the runner's cleanup before the
    /// tempdir is removed
    async fn cleanup(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// `my_crate::tools::Scratch` -> `Scratch`
fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
