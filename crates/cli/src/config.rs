//! Run defaults loaded from an optional YAML file.
//!
//! Everything here has a built-in default; a config file only overrides
//! what it names:
//!
//! ```yaml
//! games: 2000000
//! threads: 8
//! bench_games: 1500000
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

fn default_games() -> u64 {
    1_000_000
}

fn default_bench_games() -> u64 {
    1_500_000
}

/// CLI defaults. `threads: 0` means one worker per available core.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_games")]
    pub games: u64,
    #[serde(default)]
    pub threads: usize,
    #[serde(default = "default_bench_games")]
    pub bench_games: u64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            games: default_games(),
            threads: 0,
            bench_games: default_bench_games(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a field
    /// fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Config::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a field fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.games == 0 || self.bench_games == 0 {
            return Err(ConfigError::ZeroGames);
        }
        Ok(())
    }

    /// Worker count, resolving 0 to the machine's parallelism.
    pub fn threads_or_auto(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        }
    }
}

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("game counts must be positive")]
    ZeroGames,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = Config::from_yaml("threads: 4").unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.games, 1_000_000);
        assert_eq!(config.bench_games, 1_500_000);
    }

    #[test]
    fn zero_games_rejected() {
        assert!(matches!(
            Config::from_yaml("games: 0"),
            Err(ConfigError::ZeroGames)
        ));
    }

    #[test]
    fn auto_threads_resolve_to_at_least_one() {
        let config = Config::default();
        assert!(config.threads_or_auto() >= 1);
    }
}
