//! Configuration sections
//!
//! # Main Types
//!
//! - [`FilterSettings`] - Defaults applied when filters are created or cleared
//! - [`StorageSettings`] - Where datasets live and how long a fetch may take
//! - [`LoggingSettings`] - Log filter directive and optional log directory
//! - [`ColumnLabels`] - Display names of the dataset columns

use crate::pipeline::filters::{DEFAULT_EXCLUDED_ATTRIBUTES, DEFAULT_TOP_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default dataset fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// Default log filter directive
pub const DEFAULT_LOG_FILTER: &str = "info,flowvis_rs=debug";

/// Filter defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Number of entities kept by the top/bottom filter
    pub top_limit: usize,

    /// Attribute values not accepted when the paragraph filter is initialized
    pub excluded_attributes: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            top_limit: DEFAULT_TOP_LIMIT,
            excluded_attributes: DEFAULT_EXCLUDED_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Dataset storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Dataset directory; defaults to `<app data>/datasets`
    pub data_dir: Option<PathBuf>,

    /// Key the working dataset is stored under
    pub dataset_key: String,

    /// Maximum time a dataset fetch may take
    pub fetch_timeout_ms: u64,
}

impl StorageSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            dataset_key: crate::dataset::DEFAULT_DATASET_KEY.to_string(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,

    /// Directory for daily rolling log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
        }
    }
}

/// Display names of the dataset columns.
///
/// Only used for display, e.g. the unit postfix of range sliders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnLabels {
    pub source_node: String,
    pub target_node: String,
    pub time_node: String,
    pub value_node: String,
    pub source_tag: String,
    pub target_tag: String,
    pub attribute1: String,
}

impl ColumnLabels {
    /// Postfix shown after values in range sliders.
    pub fn value_postfix(&self) -> &str {
        &self.value_node
    }
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            source_node: "source".to_string(),
            target_node: "target".to_string(),
            time_node: "time".to_string(),
            value_node: "value".to_string(),
            source_tag: "sourceHash".to_string(),
            target_tag: "targetHash".to_string(),
            attribute1: "attribute 1".to_string(),
        }
    }
}
