//! Configuration management for fieldhist
//!
//! Loading, validating and saving the settings shared by the library and
//! the demo binary: where the history database lives, how many history
//! values a field surfaces, and when filtering kicks in.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".fieldhist.json";

/// Default number of history values shown ahead of the primary suggestions
pub const DEFAULT_MAX_HISTORY_VALUES: usize = 5;

/// Default number of typed characters needed before text filtering starts
pub const DEFAULT_THRESHOLD: usize = 2;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite history database
    pub database_path: PathBuf,

    /// Per-field behaviour
    pub field: FieldConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Settings applied to every history field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Maximum number of history entries in the suggestion list
    pub max_history_values: usize,

    /// Minimum trimmed length of typed text before it filters suggestions
    pub threshold: usize,
}

/// Configuration for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: crate::default_database_path()
                .unwrap_or_else(|_| PathBuf::from("/tmp").join(crate::DEFAULT_DATABASE_FILE)),
            field: FieldConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_history_values: DEFAULT_MAX_HISTORY_VALUES,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl FieldConfig {
    /// Validate the field settings
    pub fn validate(&self) -> Result<()> {
        if self.max_history_values == 0 {
            return Err(Error::config_validation(
                "field.max_history_values",
                "must be greater than 0",
            ));
        }

        if self.threshold == 0 {
            return Err(Error::config_validation(
                "field.threshold",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
        Ok(home.join(DEFAULT_CONFIG_FILE))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.field.validate()?;

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config_validation(
                    "logging.level",
                    "must be one of: trace, debug, info, warn, error",
                ))
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.field.max_history_values, DEFAULT_MAX_HISTORY_VALUES);
        assert_eq!(config.field.threshold, DEFAULT_THRESHOLD);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.field.max_history_values = 0;
        assert!(config.validate().is_err());

        config.field.max_history_values = 3;
        config.field.threshold = 0;
        assert!(config.validate().is_err());

        config.field.threshold = 1;
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path().to_path_buf();

        let mut config = Config::default();
        config.field.max_history_values = 8;
        config.database_path = PathBuf::from("/var/tmp/fields.db");

        config.save_to_path(&config_path).unwrap();
        let loaded = Config::load_from_path(&config_path).unwrap();

        assert_eq!(loaded.field.max_history_values, 8);
        assert_eq!(loaded.database_path, PathBuf::from("/var/tmp/fields.db"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.field, FieldConfig::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "{ not json").unwrap();
        let err = Config::load_from_path(temp_file.path()).unwrap_err();
        assert_eq!(err.category(), "json");
    }
}
