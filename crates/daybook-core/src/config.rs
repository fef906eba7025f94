//! Configuration management for Daybook.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate location.

use crate::error::{DaybookError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure for Daybook.
///
/// ## Example Configuration File (daybook.toml)
///
/// ```toml
/// [notes]
/// base_path = "/home/user/daybook"
///
/// [search]
/// threshold = 40
/// approximate = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Note storage settings
    pub notes: NotesConfig,

    /// Fuzzy search settings
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            notes: NotesConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Note storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotesConfig {
    /// Base directory for note storage (None = platform data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<PathBuf>,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum score (0-100) for a note to appear in fuzzy results
    pub threshold: u32,

    /// Use approximate matching; false selects the exact-substring fallback
    pub approximate: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            threshold: 40,
            approximate: true,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| DaybookError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self).map_err(|e| DaybookError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "daybook").ok_or_else(|| DaybookError::ConfigError {
            reason: "Could not determine config directory".to_string(),
        })?;

        Ok(dirs.config_dir().join("daybook.toml"))
    }

    /// Get the notes base directory (from config or platform default).
    pub fn notes_base_dir(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.notes.base_path {
            return Ok(path.clone());
        }
        let dirs = ProjectDirs::from("", "", "daybook").ok_or_else(|| DaybookError::ConfigError {
            reason: "Could not determine data directory".to_string(),
        })?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.threshold, 40);
        assert!(config.search.approximate);
        assert!(config.notes.base_path.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("daybook.toml");

        let mut config = Config::default();
        config.search.threshold = 65;
        config.notes.base_path = Some(PathBuf::from("/srv/notes"));

        config.save_to(&config_path).unwrap();
        let loaded = Config::load_from(&config_path).unwrap();

        assert_eq!(loaded.search.threshold, 65);
        assert_eq!(loaded.notes.base_path, Some(PathBuf::from("/srv/notes")));
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.search.threshold, 40); // Default value
    }

    #[test]
    fn test_load_malformed_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[search\nthreshold = ").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, DaybookError::ConfigError { .. }));
    }

    #[test]
    fn test_explicit_base_path_wins() {
        let mut config = Config::default();
        config.notes.base_path = Some(PathBuf::from("/tmp/notes"));
        assert_eq!(config.notes_base_dir().unwrap(), PathBuf::from("/tmp/notes"));
    }
}
