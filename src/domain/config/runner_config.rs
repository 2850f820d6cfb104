//! Runner configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::level::LevelName;

/// Format of application log lines
pub const LOG_FMT: &str = "{name} {levelname} {message}";

/// Format of non-application log lines on the root channel
pub const ROOT_LOG_FMT: &str = "{name}: {levelname} {message}";

/// Format of the `stdout` logger
pub const STDOUT_LOG_FMT: &str = "{message}";

/// Format of the handler `basic_config` installs on an empty root logger
pub const BASIC_LOG_FMT: &str = "{levelname}:{name}:{message}";

/// Runner configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Default for `--verbosity`
    pub verbosity: Option<LevelName>,
    /// Default for `--log-level`
    pub log_level: Option<LevelName>,
    /// Application log format
    pub log_fmt: Option<String>,
    /// Root channel log format
    pub root_log_fmt: Option<String>,
    /// Force colors on (true) or off (false); unset follows the terminal
    pub color: Option<bool>,
}

impl RunnerConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            verbosity: Some(LevelName::Info),
            log_level: Some(LevelName::Warn),
            log_fmt: Some(LOG_FMT.to_string()),
            root_log_fmt: Some(ROOT_LOG_FMT.to_string()),
            color: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            verbosity: other.verbosity.or(self.verbosity),
            log_level: other.log_level.or(self.log_level),
            log_fmt: other.log_fmt.or(self.log_fmt),
            root_log_fmt: other.root_log_fmt.or(self.root_log_fmt),
            color: other.color.or(self.color),
        }
    }

    /// Build the environment layer, reading `<PREFIX>_VERBOSITY` and
    /// `<PREFIX>_LOG_LEVEL` through `lookup`. Unparseable values are ignored.
    pub fn from_env_with<F>(prefix: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = env_prefix(prefix);
        let level = |suffix: &str| {
            lookup(&format!("{}_{}", prefix, suffix))
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse::<LevelName>().ok())
        };

        Self {
            verbosity: level("VERBOSITY"),
            log_level: level("LOG_LEVEL"),
            ..Self::empty()
        }
    }

    /// Build the environment layer from the process environment
    pub fn from_env(prefix: &str) -> Self {
        Self::from_env_with(prefix, |key| std::env::var(key).ok())
    }

    pub fn verbosity_or_default(&self) -> LevelName {
        self.verbosity.unwrap_or(LevelName::Info)
    }

    pub fn log_level_or_default(&self) -> LevelName {
        self.log_level.unwrap_or(LevelName::Warn)
    }

    pub fn log_fmt_or_default(&self) -> &str {
        self.log_fmt.as_deref().unwrap_or(LOG_FMT)
    }

    pub fn root_log_fmt_or_default(&self) -> &str {
        self.root_log_fmt.as_deref().unwrap_or(ROOT_LOG_FMT)
    }
}

/// `my-tool` -> `MY_TOOL`
fn env_prefix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
