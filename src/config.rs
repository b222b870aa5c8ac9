//! Configuration module for custom_markdown_lint
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - User configuration (~/.config/custom_markdown_lint/config.toml)
//! - Project configuration (./custom_markdown_lint.toml)
//! - Environment variables
//!
//! With no configuration at all the module runs `mdl` from `PATH`.

use crate::modules::markdown_lint::DEFAULT_LINTER;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "CUSTOM_MARKDOWN_LINT_CONFIG";

/// Environment variable overriding the linter executable
pub const EXECUTABLE_ENV: &str = "CUSTOM_MARKDOWN_LINT_EXECUTABLE";

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "CUSTOM_MARKDOWN_LINT_LOG";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External linter settings
    pub linter: LinterConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// External linter settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinterConfig {
    /// Executable name or path, `mdl` when unset
    pub executable: Option<String>,
}

impl LinterConfig {
    /// The executable to run
    pub fn executable(&self) -> &str {
        self.executable.as_deref().unwrap_or(DEFAULT_LINTER)
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `debug` or `custom_markdown_lint=trace`
    pub level: Option<String>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// An explicit path (argument or environment) must exist; the implicit
    /// user and project files are skipped when absent.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = Self::explicit_config_path(config_path) {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            config = config.merge_from_file(&path)?;
        } else {
            for path in Self::get_config_paths() {
                if path.exists() {
                    config = config.merge_from_file(&path)?;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Explicit path takes priority over the environment
    fn explicit_config_path(explicit_path: Option<&PathBuf>) -> Option<PathBuf> {
        explicit_path
            .cloned()
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
    }

    /// Get the list of implicit configuration file paths, lowest priority first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("custom_markdown_lint/config.toml"));
        }

        paths.push(PathBuf::from("custom_markdown_lint.toml"));

        paths
    }

    /// Merge configuration from a file
    fn merge_from_file(&self, path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // Determine format based on extension
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let file_config: Config = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            _ => toml::from_str(&content)
                .or_else(|_| serde_yaml::from_str(&content))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        Ok(self.merge(file_config))
    }

    /// Merge another config into this one, values set in `other` win
    fn merge(&self, other: Config) -> Config {
        Config {
            linter: LinterConfig {
                executable: other
                    .linter
                    .executable
                    .or_else(|| self.linter.executable.clone()),
            },
            logging: LoggingConfig {
                level: other.logging.level.or_else(|| self.logging.level.clone()),
            },
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(executable) = std::env::var(EXECUTABLE_ENV) {
            if !executable.is_empty() {
                self.linter.executable = Some(executable);
            }
        }

        if let Ok(level) = std::env::var(LOG_ENV) {
            self.logging.level = Some(level);
        }
    }

    /// Load from a specific file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        Config::default().merge_from_file(&path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.linter.executable(), "mdl");
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_config_merge() {
        let base = Config {
            logging: LoggingConfig {
                level: Some("info".into()),
            },
            ..Config::default()
        };
        let other = Config {
            linter: LinterConfig {
                executable: Some("markdownlint".into()),
            },
            ..Config::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.linter.executable(), "markdownlint");
        assert_eq!(merged.logging.level.as_deref(), Some("info"));
    }

    #[test]
    fn test_from_toml_and_yaml_files() {
        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml_file, "[linter]\nexecutable = \"/usr/local/bin/mdl\"").unwrap();
        let config = Config::from_file(toml_file.path()).unwrap();
        assert_eq!(config.linter.executable(), "/usr/local/bin/mdl");

        let mut yaml_file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml_file, "logging:\n  level: debug").unwrap();
        let config = Config::from_file(yaml_file.path()).unwrap();
        assert_eq!(config.linter.executable(), "mdl");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, "{{ not json").unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var(EXECUTABLE_ENV, "/opt/mdl");
        std::env::set_var(LOG_ENV, "trace");
        let mut config = Config::default();
        config.apply_env_overrides();
        std::env::remove_var(EXECUTABLE_ENV);
        std::env::remove_var(LOG_ENV);

        assert_eq!(config.linter.executable(), "/opt/mdl");
        assert_eq!(config.logging.level.as_deref(), Some("trace"));
    }

    #[test]
    #[serial]
    fn test_explicit_path_wins() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[linter]\nexecutable = \"mdl-explicit\"").unwrap();
        let path = file.path().to_path_buf();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.linter.executable(), "mdl-explicit");
    }

    #[test]
    fn test_explicit_default_overrides_earlier_file() {
        let user = Config {
            linter: LinterConfig {
                executable: Some("/opt/custom/mdl".into()),
            },
            ..Config::default()
        };
        let project: Config = toml::from_str("[linter]\nexecutable = \"mdl\"").unwrap();

        assert_eq!(user.merge(project).linter.executable(), "mdl");
    }

    #[test]
    fn test_unset_executable_keeps_earlier_file() {
        let user = Config {
            linter: LinterConfig {
                executable: Some("/opt/custom/mdl".into()),
            },
            ..Config::default()
        };

        assert_eq!(user.merge(Config::default()).linter.executable(), "/opt/custom/mdl");
    }

    #[test]
    #[serial]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.toml");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("typo.toml"));
    }

    #[test]
    #[serial]
    fn test_missing_env_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(CONFIG_ENV, dir.path().join("absent.toml"));
        let result = Config::load(None);
        std::env::remove_var(CONFIG_ENV);

        assert!(result.is_err());
    }
}
