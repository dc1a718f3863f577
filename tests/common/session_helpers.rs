//! Session construction helpers

use flowvis_rs::config::{ColumnLabels, FilterSettings};
use flowvis_rs::pipeline::{
    FilterBridge, FilterEvent, FilterSnapshot, PipelineBuilder, PipelineHandle, StandardFilterIds,
};
use flowvis_rs::{Dataset, FilterSession};

/// A calibrated session over `dataset` with the default filters, plus its bridge.
///
/// Events produced by calibration are drained.
pub fn calibrated_session(dataset: Dataset) -> (FilterSession, FilterBridge, StandardFilterIds) {
    let (bridge, cmd_rx, event_tx) = FilterBridge::new();
    let (pipeline, ids) = PipelineBuilder::new(FilterSettings::default()).build_default();
    let mut session = FilterSession::new(
        PipelineHandle::new(pipeline),
        dataset,
        FilterSettings::default(),
        ColumnLabels::default(),
        cmd_rx,
        event_tx,
    );
    session.calibrate();
    bridge.drain();
    (session, bridge, ids)
}

/// The most recent `FilterChanged` snapshot among `events`.
pub fn last_snapshot(events: &[FilterEvent]) -> Option<FilterSnapshot> {
    events.iter().rev().find_map(|e| match e {
        FilterEvent::FilterChanged(snapshot) => Some(snapshot.clone()),
        _ => None,
    })
}
