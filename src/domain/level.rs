//! Log level names and the level lookup table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use super::error::InvalidLevelError;

/// Level names accepted on the command line and in config
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelName {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Name to level table shared by `verbosity` and `log_level`
pub const LOG_LEVELS: [(LevelName, LevelFilter); 4] = [
    (LevelName::Debug, LevelFilter::DEBUG),
    (LevelName::Info, LevelFilter::INFO),
    (LevelName::Warn, LevelFilter::WARN),
    (LevelName::Error, LevelFilter::ERROR),
];

/// Flag choices, in table order
pub const LEVEL_CHOICES: [&str; 4] = ["debug", "info", "warn", "error"];

impl LevelName {
    /// Get the flag/config spelling
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Resolve through [`LOG_LEVELS`]
    pub fn level(&self) -> LevelFilter {
        LOG_LEVELS
            .iter()
            .find(|(name, _)| name == self)
            .map(|(_, level)| *level)
            .unwrap_or(LevelFilter::INFO)
    }
}

impl fmt::Display for LevelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelName {
    type Err = InvalidLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(InvalidLevelError {
                input: s.to_string(),
            }),
        }
    }
}

/// Look up a level by its flag spelling
pub fn level_for(name: &str) -> Result<LevelFilter, InvalidLevelError> {
    name.parse::<LevelName>().map(|name| name.level())
}
