//! Configuration module
//!
//! Handles loading and managing runner configuration.

mod env;
mod file;

pub use env::{print_env_help, EnvBuilder, EnvConfig, EnvGuard};
pub use file::{expand_path, find_config_file};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::utils::LogLevel;

/// Runner configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Timeout for tests that do not declare one, in milliseconds
    pub default_timeout_ms: u64,

    /// Comma-separated tag inclusion list
    pub tags: Option<String>,

    /// Log level for the binary
    pub log_level: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 5000,
            tags: None,
            log_level: "info".to_string(),
        }
    }
}

impl RunnerConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if file::is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if file::is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_timeout_ms == 0 {
            anyhow::bail!("default_timeout_ms must be greater than zero");
        }

        if LogLevel::from_str(&self.log_level).is_none() {
            anyhow::bail!("Unknown log level: {}", self.log_level);
        }

        Ok(())
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_env(mut self, env: &EnvConfig) -> Self {
        if let Some(tags) = &env.tags {
            self.tags = Some(tags.clone());
        }
        if let Some(timeout) = env.timeout_ms {
            self.default_timeout_ms = timeout;
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
        self
    }

    /// Resolve the effective configuration: explicit file, then discovered
    /// file, then defaults, with environment overrides applied last
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvConfig::load();

        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.as_deref().map(expand_path))
            .or_else(find_config_file);

        let base = match path {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };

        let config = base.with_env(&env);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.default_timeout(), Duration::from_secs(5));
        assert!(config.tags.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("paramspec.yaml");

        let config = RunnerConfig {
            default_timeout_ms: 250,
            tags: Some("foo,bar".to_string()),
            log_level: "debug".to_string(),
        };
        config.save(&path).unwrap();

        let loaded = RunnerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_json_partial() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paramspec.json");
        std::fs::write(&path, r#"{"tags": "db"}"#).unwrap();

        let loaded = RunnerConfig::load(&path).unwrap();
        assert_eq!(loaded.tags.as_deref(), Some("db"));
        assert_eq!(loaded.default_timeout_ms, 5000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = RunnerConfig {
            default_timeout_ms: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let level = RunnerConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env = EnvConfig {
            tags: Some("smoke".to_string()),
            timeout_ms: Some(100),
            ..Default::default()
        };

        let config = RunnerConfig::default().with_env(&env);
        assert_eq!(config.tags.as_deref(), Some("smoke"));
        assert_eq!(config.default_timeout_ms, 100);
        assert_eq!(config.log_level, "info");
    }
}
