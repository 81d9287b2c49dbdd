//! Tool configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via PROTOSIM_CONFIG)
//! 3. Environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PROTOSIM_CONFIG";

/// Tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Console output configuration.
    pub output: OutputConfig,
    /// Exit status configuration.
    pub exit: ExitConfig,
}

impl Config {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Applies overrides read through `lookup` (the process environment in `load`).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.output.apply_overrides(&lookup);
        self.exit.apply_overrides(&lookup);
    }
}

/// Console output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Style output with terminal colors.
    pub color: bool,
    /// Print the raw content of both documents after the tables.
    pub show_raw: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_raw: false,
        }
    }
}

impl OutputConfig {
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(color) = lookup("PROTOSIM_COLOR") {
            self.color = is_enabled(&color);
        }
        if let Some(raw) = lookup("PROTOSIM_SHOW_RAW") {
            self.show_raw = is_enabled(&raw);
        }
    }
}

/// Exit status configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitConfig {
    /// Exit with status 1 when a precondition or validation check fails.
    /// When false, those failures still exit with status 0.
    pub fail_on_error: bool,
}

impl Default for ExitConfig {
    fn default() -> Self {
        Self {
            fail_on_error: true,
        }
    }
}

impl ExitConfig {
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(fail) = lookup("PROTOSIM_FAIL_ON_ERROR") {
            self.fail_on_error = is_enabled(&fail);
        }
    }
}

fn is_enabled(value: &str) -> bool {
    value == "1" || value.to_lowercase() == "true"
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.output.color);
        assert!(!config.output.show_raw);
        assert!(config.exit.fail_on_error);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("output:\n  show_raw: true\n").unwrap();
        assert!(config.output.show_raw);
        assert!(config.output.color);
        assert!(config.exit.fail_on_error);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PROTOSIM_COLOR", "0"),
            ("PROTOSIM_SHOW_RAW", "TRUE"),
            ("PROTOSIM_FAIL_ON_ERROR", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert!(!config.output.color);
        assert!(config.output.show_raw);
        assert!(!config.exit.fail_on_error);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("protosim.yaml");
        std::fs::write(&path, "exit:\n  fail_on_error: false\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.exit.fail_on_error);

        std::fs::write(&path, "exit: [").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::from_file(dir.path().join("absent.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
