//! Dataset persistence.
//!
//! A `DatasetStore` keeps whole datasets under string keys, the way the UI
//! layer persists the parsed data between views. The pipeline only ever reads
//! the dataset stored under a fixed key ([`DEFAULT_DATASET_KEY`]).
//!
//! Retrieval goes through [`fetch_dataset`], which runs the store on a
//! blocking task and gives up after a configurable timeout.

use crate::error::{FlowVisError, Result, ResultExt};
use crate::types::{Dataset, FlowRecord, RawFlowRecord};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Storage key of the working dataset.
pub const DEFAULT_DATASET_KEY: &str = "data";

/// Key/value storage for datasets.
#[cfg_attr(test, mockall::automock)]
pub trait DatasetStore: Send + Sync {
    /// Load the dataset stored under `key`, or `None` if there is none.
    fn get_item(&self, key: &str) -> Result<Option<Dataset>>;

    /// Store `records` under `key`, replacing any previous dataset.
    fn set_item(&self, key: &str, records: &[FlowRecord]) -> Result<()>;
}

/// Stores each dataset as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl DatasetStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<Dataset>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let raw: Vec<RawFlowRecord> = serde_json::from_str(&content).map_err(|e| {
            FlowVisError::Serialization(format!("Failed to parse {:?}: {}", path, e))
        })?;
        let records = super::validate_records(raw)
            .with_context(|| format!("Invalid dataset in {:?}", path))?;
        tracing::debug!("Loaded {} records from {:?}", records.len(), path);
        Ok(Some(records))
    }

    fn set_item(&self, key: &str, records: &[FlowRecord]) -> Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| {
                FlowVisError::Store(format!("Failed to create {:?}: {}", self.dir, e))
            })?;
        }

        let path = self.path_for(key);
        let content = serde_json::to_string(records)?;
        std::fs::write(&path, content)?;
        tracing::debug!("Stored {} records to {:?}", records.len(), path);
        Ok(())
    }
}

/// In-memory store, mainly for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Dataset>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one dataset under `key`.
    pub fn with_dataset(key: impl Into<String>, records: Dataset) -> Self {
        let store = Self::new();
        store
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), records);
        store
    }
}

impl DatasetStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<Dataset>> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, records: &[FlowRecord]) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), records.to_vec());
        Ok(())
    }
}

/// Load the dataset under `key`, failing if it takes longer than `timeout`.
pub async fn fetch_dataset(
    store: Arc<dyn DatasetStore>,
    key: &str,
    timeout: Duration,
) -> Result<Dataset> {
    let owned_key = key.to_string();
    let task = tokio::task::spawn_blocking(move || store.get_item(&owned_key));

    let joined = tokio::time::timeout(timeout, task).await.map_err(|_| {
        tracing::warn!("Dataset fetch for '{}' timed out after {:?}", key, timeout);
        FlowVisError::Timeout(format!("Fetching dataset '{}' took longer than {:?}", key, timeout))
    })?;

    let loaded = joined.map_err(|e| FlowVisError::Store(format!("Fetch task failed: {}", e)))??;
    loaded.ok_or_else(|| FlowVisError::DatasetMissing(key.to_string()))
}
