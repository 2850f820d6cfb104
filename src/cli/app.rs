//! Config loading for runners

use crate::application::ports::ConfigStore;
use crate::domain::config::RunnerConfig;
use crate::infrastructure::XdgConfigStore;

/// Merge: defaults < `$XDG_CONFIG_HOME/<name>/runner.toml` < environment.
///
/// Command-line flags take precedence over all of these, since the merged
/// values only become flag defaults.
pub fn load_merged_config(name: &str) -> RunnerConfig {
    merge_config(&XdgConfigStore::for_tool(name), RunnerConfig::from_env(name))
}

/// Merge defaults, a store and an environment layer.
/// An unreadable or malformed file counts as empty.
pub fn merge_config<S: ConfigStore>(store: &S, env_config: RunnerConfig) -> RunnerConfig {
    let file_config = store.load().unwrap_or_else(|_| RunnerConfig::empty());

    RunnerConfig::defaults()
        .merge(file_config)
        .merge(env_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::level::LevelName;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_overrides_defaults_and_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runner.toml");
        fs::write(&path, "verbosity = \"debug\"\nlog_level = \"error\"\n").unwrap();
        let store = XdgConfigStore::with_path(&path);

        let env = RunnerConfig::from_env_with("scratch", |key| {
            (key == "SCRATCH_LOG_LEVEL").then(|| "info".to_string())
        });
        let config = merge_config(&store, env);

        assert_eq!(config.verbosity, Some(LevelName::Debug));
        assert_eq!(config.log_level, Some(LevelName::Info));
        assert_eq!(config.log_fmt, RunnerConfig::defaults().log_fmt);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("runner.toml");
        fs::write(&path, "verbosity = [").unwrap();

        let config = merge_config(&XdgConfigStore::with_path(&path), RunnerConfig::empty());
        assert_eq!(config, RunnerConfig::defaults());
    }
}
