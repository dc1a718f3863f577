//! Dataset store and ingestion

mod common;

use common::builders::sample_dataset;
use flowvis_rs::dataset::{fetch_dataset, ingest_json, DatasetStore, JsonFileStore, MemoryStore};
use flowvis_rs::FlowVisError;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_json_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("datasets"));
    let data = sample_dataset();

    store.set_item("data", &data).unwrap();
    assert!(store.path_for("data").exists());
    assert_eq!(store.get_item("data").unwrap(), Some(data));
    assert_eq!(store.get_item("other").unwrap(), None);
}

#[test]
fn test_stored_file_is_ingestible() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.set_item("data", &sample_dataset()).unwrap();

    let json = std::fs::read_to_string(store.path_for("data")).unwrap();
    assert!(json.contains("\"sourceNode\""));
    assert_eq!(ingest_json(&json).unwrap(), sample_dataset());
}

#[test]
fn test_ingest_rejects_non_numeric_value() {
    let json = r#"[
        {"sourceNode": "A", "targetNode": "B", "timeNode": 20151, "valueNode": 10},
        {"sourceNode": "A", "targetNode": "C", "timeNode": 20151, "valueNode": "lots"}
    ]"#;

    let err = ingest_json(json).unwrap_err();
    assert!(err.to_string().contains("Record 1"));
}

#[test]
fn test_ingest_accepts_numeric_strings() {
    let json = r#"[
        {"sourceNode": "A", "targetNode": "B", "timeNode": "20151", "valueNode": "12.5"}
    ]"#;
    let data = ingest_json(json).unwrap();
    assert_eq!(data[0].value_node(), 12.5);
    assert_eq!(data[0].time_node().value(), 20151);
}

#[tokio::test]
async fn test_fetch_from_memory_store() {
    let store = Arc::new(MemoryStore::with_dataset("data", sample_dataset()));
    let data = fetch_dataset(store, "data", common::test_timeout())
        .await
        .unwrap();
    assert_eq!(data.len(), 4);
}

#[tokio::test]
async fn test_fetch_missing_key() {
    let store = Arc::new(MemoryStore::new());
    let err = fetch_dataset(store, "data", Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowVisError::DatasetMissing(key) if key == "data"));
}

#[tokio::test]
async fn test_fetch_from_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.set_item("data", &sample_dataset()).unwrap();

    let data = fetch_dataset(Arc::new(store), "data", Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(data, sample_dataset());
}
