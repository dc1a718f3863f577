//! Dataset ingestion, normalization and storage.
//!
//! Records enter the application through [`ingest_json`] (or a
//! [`store::DatasetStore`]), where every numeric field is validated. The tag
//! normalization pass in [`tags`] runs once per dataset before tag filters
//! are calibrated.

pub mod store;
pub mod tags;

pub use store::{fetch_dataset, DatasetStore, JsonFileStore, MemoryStore, DEFAULT_DATASET_KEY};
pub use tags::{apply_node_tags, derive_node_tags, normalize_tags, NodeTags};

use crate::error::{FlowVisError, Result};
use crate::types::{Dataset, FlowRecord, RawFlowRecord};

/// Validate raw records, reporting the index of the first bad row.
pub fn validate_records(raw: Vec<RawFlowRecord>) -> Result<Dataset> {
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            FlowRecord::try_from(r).map_err(|e| e.with_context(format!("Record {}", i)))
        })
        .collect()
}

/// Parse and validate a JSON array of flow records.
pub fn ingest_json(json: &str) -> Result<Dataset> {
    let raw: Vec<RawFlowRecord> = serde_json::from_str(json)
        .map_err(|e| FlowVisError::Serialization(format!("Malformed dataset: {}", e)))?;
    let records = validate_records(raw)?;
    tracing::debug!("Ingested {} records", records.len());
    Ok(records)
}
