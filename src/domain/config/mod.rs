//! Configuration value objects

mod runner_config;

pub use runner_config::{RunnerConfig, BASIC_LOG_FMT, LOG_FMT, ROOT_LOG_FMT, STDOUT_LOG_FMT};
