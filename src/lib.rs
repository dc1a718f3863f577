//! # FlowVis-RS: filter pipeline for flow visualization
//!
//! Filters a dataset of money flows (payer → recipient, per quarter) before it
//! is drawn as a Sankey diagram. Filters are composed by logical AND: a record
//! survives only if every active filter keeps it.
//!
//! ## Architecture
//!
//! - **Dataset**: validated [`FlowRecord`]s loaded from a [`dataset::DatasetStore`]
//! - **Pipeline**: role filters (top, entity search, media search) followed by
//!   generic filters (range, attribute, tag) in registration order
//! - **Session**: owns the dataset, applies UI commands and publishes results
//! - **Communication**: Crossbeam channels between the UI and the session
//!
//! ## Configuration
//!
//! Configuration is stored as TOML in the platform-appropriate data directory
//! under `dev.flowvis.flowvis-rs` (see [`config`]).
//!
//! ## Example
//!
//! ```ignore
//! use flowvis_rs::{
//!     config::AppConfig,
//!     pipeline::{FilterBridge, PipelineBuilder, PipelineHandle},
//!     session::FilterSession,
//! };
//!
//! let config = AppConfig::load_or_default();
//! let (pipeline, ids) = PipelineBuilder::new(config.filters.clone()).build_default();
//! let (bridge, cmd_rx, event_tx) = FilterBridge::new();
//! let mut session = FilterSession::new(
//!     PipelineHandle::new(pipeline),
//!     dataset,
//!     config.filters,
//!     config.column_labels,
//!     cmd_rx,
//!     event_tx,
//! );
//! session.calibrate();
//!
//! bridge.set_entity_search_term("ministry");
//! session.process_pending();
//! for event in bridge.drain() {
//!     // redraw
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{FlowVisError, Result};
pub use pipeline::{
    FilterBridge, FilterCommand, FilterEvent, FilterPipeline, FilterUpdate, PipelineHandle,
};
pub use session::FilterSession;
pub use types::{Dataset, FlowRecord, NodeSide, TimeKey};
