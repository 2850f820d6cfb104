//! tool-runner - a base for small async command-line tools
//!
//! A tool implements [`cli::Tool`] and hands itself to a [`cli::Runner`],
//! which parses arguments, wires two logging channels (the tool's own
//! records and everything else), provides a scratch tempdir, and drives the
//! tool's `run` operation on a single-threaded runtime.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Level table, exit codes, runner config, and errors
//! - **Application**: The `catches`/`cleansup` operation wrappers and port traits
//! - **Infrastructure**: Logging registry and handlers, XDG config store
//! - **CLI**: Argument parsing, the `Tool` trait and the `Runner`

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
