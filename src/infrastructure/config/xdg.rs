//! XDG config store adapter

use std::fs;
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::RunnerConfig;
use crate::domain::error::ConfigError;

/// File name of a tool's runner config
pub const CONFIG_FILE: &str = "runner.toml";

/// XDG-compliant config store
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Store at `$XDG_CONFIG_HOME/<tool>/runner.toml`
    pub fn for_tool(name: &str) -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(name);

        Self {
            path: config_dir.join(CONFIG_FILE),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<RunnerConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl ConfigStore for XdgConfigStore {
    fn load(&self) -> Result<RunnerConfig, ConfigError> {
        if !self.exists() {
            return Ok(RunnerConfig::empty());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::level::LevelName;
    use tempfile::TempDir;

    #[test]
    fn default_path_is_per_tool() {
        let store = XdgConfigStore::for_tool("scratch");
        assert!(store.path.to_string_lossy().contains("scratch"));
        assert!(store.path.ends_with(CONFIG_FILE));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("runner.toml"));

        assert!(!store.exists());
        assert_eq!(store.load().unwrap(), RunnerConfig::empty());
    }

    #[test]
    fn parses_partial_file() {
        let config = XdgConfigStore::parse_toml(
            r#"
verbosity = "debug"
root_log_fmt = "{name} says {message}"
"#,
        )
        .unwrap();

        assert_eq!(config.verbosity, Some(LevelName::Debug));
        assert_eq!(config.log_level, None);
        assert_eq!(config.root_log_fmt.as_deref(), Some("{name} says {message}"));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runner.toml");
        fs::write(&path, "log_level = \"error\"\n").unwrap();
        let store = XdgConfigStore::with_path(path);

        assert!(store.exists());
        assert_eq!(store.load().unwrap().log_level, Some(LevelName::Error));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = XdgConfigStore::parse_toml(r#"log_level = "loud""#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
