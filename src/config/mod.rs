//! Configuration module for FlowVis-RS
//!
//! This module handles application configuration including:
//! - Filter defaults (top-N size, attributes hidden on startup)
//! - Dataset storage location, key and fetch timeout
//! - Logging filter and optional log directory
//! - Column labels used for display postfixes
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.flowvis.flowvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.flowvis.flowvis-rs/`
//! - **Windows**: `%APPDATA%\dev.flowvis.flowvis-rs\`
//!
//! # Files
//!
//! - `config.toml` - Application configuration
//! - `datasets/<key>.json` - Stored datasets (see [`crate::dataset::JsonFileStore`])
//!
//! # Example
//!
//! ```ignore
//! use flowvis_rs::config::AppConfig;
//!
//! let mut config = AppConfig::load_or_default();
//! config.filters.top_limit = 5;
//! config.save()?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{FlowVisError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.flowvis.flowvis-rs";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Subdirectory holding stored datasets
pub const DATASET_DIR: &str = "datasets";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        FlowVisError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            FlowVisError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== App Config ====================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Filter defaults
    #[serde(default)]
    pub filters: FilterSettings,

    /// Dataset storage
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Display labels of the dataset columns
    #[serde(default)]
    pub column_labels: ColumnLabels,
}

impl AppConfig {
    /// Load config from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            FlowVisError::Config("Could not determine config path".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FlowVisError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;

        toml::from_str(&content)
            .map_err(|e| FlowVisError::Config(format!("Failed to parse config {:?}: {}", path, e)))
    }

    /// Load config, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| FlowVisError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| FlowVisError::Config(format!("Failed to write config {:?}: {}", path, e)))
    }

    /// Directory datasets are stored in: the configured one, or `<app data>/datasets`.
    pub fn dataset_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => app_data_dir().map(|p| p.join(DATASET_DIR)).ok_or_else(|| {
                FlowVisError::Config("Could not determine dataset directory".to_string())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.filters.top_limit, 10);
        assert_eq!(config.filters.excluded_attributes, vec!["31".to_string()]);
        assert_eq!(config.storage.dataset_key, "data");
        assert_eq!(config.column_labels.value_node, "value");
    }

    #[test]
    fn test_config_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.filters.top_limit = 5;
        config.storage.data_dir = Some(dir.path().join("sets"));
        config.column_labels.value_node = "EUR".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.dataset_dir().unwrap(), dir.path().join("sets"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("[filters]\ntop_limit = 3\n").unwrap();
        assert_eq!(config.filters.top_limit, 3);
        assert_eq!(config.filters.excluded_attributes, vec!["31".to_string()]);
        assert_eq!(config.storage.fetch_timeout_ms, DEFAULT_FETCH_TIMEOUT_MS);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "filters = 12").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(FlowVisError::Config(_))
        ));
    }
}
