//! Configuration management for Threadcast

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::thread::DEFAULT_MAX_LENGTH;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thread: ThreadConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadConfig {
    /// Per-post weighted length budget used when a request sets none
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Zone for local schedules that do not name one
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl ThreadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "thread.max_length".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.thread.validate()?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self::default()
    }
}

/// Resolve the configuration file path following XDG Base Directory conventions
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("THREADCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("threadcast").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThreadcastError;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_config();
        assert_eq!(config.thread.max_length, 280);
        assert_eq!(config.schedule.timezone, "UTC");
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
[thread]
max_length = 500

[schedule]
timezone = "Europe/Berlin"
"#,
        );

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.thread.max_length, 500);
        assert_eq!(config.schedule.timezone, "Europe/Berlin");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = write_config("[schedule]\ntimezone = \"GMT\"\n");

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.thread.max_length, 280);
        assert_eq!(config.schedule.timezone, "GMT");
    }

    #[test]
    fn test_zero_max_length_is_rejected() {
        let file = write_config("[thread]\nmax_length = 0\n");

        let result = Config::load_from_path(file.path());
        assert!(matches!(
            result,
            Err(ThreadcastError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let file = write_config("[thread\nmax_length = ");

        let result = Config::load_from_path(file.path());
        assert!(matches!(
            result,
            Err(ThreadcastError::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = Config::load_from_path(Path::new("/nonexistent/threadcast/config.toml"));
        assert!(matches!(
            result,
            Err(ThreadcastError::Config(ConfigError::ReadError(_)))
        ));
    }

    #[test]
    #[serial]
    fn test_resolve_config_path_from_env() {
        std::env::set_var("THREADCAST_CONFIG", "/tmp/threadcast-test.toml");
        let path = resolve_config_path().unwrap();
        std::env::remove_var("THREADCAST_CONFIG");

        assert_eq!(path, PathBuf::from("/tmp/threadcast-test.toml"));
    }

    #[test]
    #[serial]
    fn test_load_uses_env_path() {
        let file = write_config("[thread]\nmax_length = 140\n");
        std::env::set_var("THREADCAST_CONFIG", file.path());
        let config = Config::load();
        std::env::remove_var("THREADCAST_CONFIG");

        assert_eq!(config.unwrap().thread.max_length, 140);
    }
}
