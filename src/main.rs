//! FlowVis-RS - Main Entry Point
//!
//! Loads the working dataset, builds the default filter pipeline and prints
//! the filter state for it.
//!
//! ```text
//! flowvis-rs [DATASET.json]
//! ```
//!
//! With a path, the JSON file is validated and saved to the dataset store
//! first. Without one, the dataset stored under the configured key is used.

use anyhow::Context;
use flowvis_rs::{
    config::AppConfig,
    dataset::{fetch_dataset, ingest_json, DatasetStore, JsonFileStore},
    logging,
    pipeline::{FilterBridge, FilterEvent, PipelineBuilder, PipelineHandle},
    session::FilterSession,
};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_or_default();
    let _log_guard = logging::init(&config.logging);

    tracing::info!("Starting FlowVis");

    let store: Arc<dyn DatasetStore> = Arc::new(JsonFileStore::new(config.dataset_dir()?));
    let key = config.storage.dataset_key.clone();

    if let Some(path) = std::env::args().nth(1) {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read dataset {}", path))?;
        let records = ingest_json(&json).with_context(|| format!("Invalid dataset {}", path))?;
        store
            .set_item(&key, &records)
            .context("Failed to store dataset")?;
        tracing::info!("Stored {} records from {} as '{}'", records.len(), path, key);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;
    let dataset = runtime
        .block_on(fetch_dataset(store, &key, config.storage.fetch_timeout()))
        .context("Failed to load dataset")?;
    drop(runtime);

    // Create the filter bridge and spawn the session thread
    let (bridge, cmd_rx, event_tx) = FilterBridge::new();
    let (pipeline, _ids) = PipelineBuilder::new(config.filters.clone()).build_default();
    let mut session = FilterSession::new(
        PipelineHandle::new(pipeline),
        dataset,
        config.filters.clone(),
        config.column_labels.clone(),
        cmd_rx,
        event_tx,
    );
    let session_handle = std::thread::spawn(move || {
        session.calibrate();
        session.run();
    });

    bridge.print_filters();
    bridge.shutdown();

    for event in bridge.event_rx.iter() {
        match event {
            FilterEvent::FilterChanged(snapshot) => {
                println!("{} of {} records pass", snapshot.len(), snapshot.total);
            }
            FilterEvent::SliderRangesChanged(bounds) => {
                for b in bounds {
                    println!("{}: {} .. {} {}", b.field.display_name(), b.min, b.max, b.postfix);
                }
            }
            FilterEvent::FiltersPrinted(lines) => {
                for line in lines {
                    println!("{}", line);
                }
            }
            FilterEvent::Error(message) => eprintln!("error: {}", message),
            FilterEvent::Shutdown => break,
            _ => {}
        }
    }

    tracing::info!("Shutting down...");
    session_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Filter session panicked"))?;

    Ok(())
}
