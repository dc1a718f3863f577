//! Filter session.
//!
//! The session owns the unfiltered dataset and a handle to the pipeline. It
//! receives [`FilterCommand`]s from the UI over a [`FilterBridge`], applies
//! them, re-runs the pipeline and publishes [`FilterEvent`]s back.
//!
//! # Side effects of commands
//!
//! - Changing a search term switches the top filter off and emits
//!   `TopFilterDeactivated`.
//! - Changing a time range recalibrates every other range filter over the
//!   records that reach it and emits `SliderRangesChanged`.
//! - `ClearFilters` restores the state produced by [`FilterSession::calibrate`].
//!
//! Every update is recorded in the [`InteractionLog`].
//!
//! [`FilterBridge`]: crate::pipeline::FilterBridge

pub mod interaction_log;

pub use interaction_log::{InteractionLog, LogEntry};

use crate::config::{ColumnLabels, FilterSettings};
use crate::dataset::normalize_tags;
use crate::pipeline::{
    BuiltinFilter, Filter, FilterCommand, FilterEvent, FilterId, FilterSnapshot, FilterUpdate,
    PipelineHandle, PipelineResult, RangeBounds, RangeField,
};
use crate::types::{Dataset, NodeSide};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

/// Runs filter commands against one dataset.
pub struct FilterSession {
    pipeline: PipelineHandle,
    dataset: Arc<Dataset>,
    settings: FilterSettings,
    labels: ColumnLabels,
    log: InteractionLog,
    cmd_rx: Receiver<FilterCommand>,
    event_tx: Sender<FilterEvent>,
    generation: u64,
}

impl FilterSession {
    /// Create a session over `dataset`. Tags are normalized per node on both
    /// sides before the dataset is stored.
    ///
    /// Call [`calibrate`](Self::calibrate) before the first run.
    pub fn new(
        pipeline: PipelineHandle,
        dataset: Dataset,
        settings: FilterSettings,
        labels: ColumnLabels,
        cmd_rx: Receiver<FilterCommand>,
        event_tx: Sender<FilterEvent>,
    ) -> Self {
        Self {
            pipeline,
            dataset: Arc::new(prepare_dataset(dataset)),
            settings,
            labels,
            log: InteractionLog::new(),
            cmd_rx,
            event_tx,
            generation: 0,
        }
    }

    pub fn pipeline(&self) -> &PipelineHandle {
        &self.pipeline
    }

    /// The unfiltered dataset.
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn interaction_log(&self) -> &InteractionLog {
        &self.log
    }

    /// Number of pipeline runs so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Swap in a new dataset and recalibrate every filter against it.
    pub fn replace_dataset(&mut self, dataset: Dataset) -> FilterSnapshot {
        self.dataset = Arc::new(prepare_dataset(dataset));
        tracing::info!("Dataset replaced: {} records", self.dataset.len());
        self.calibrate()
    }

    /// Put every filter into its initial state for the current dataset, then
    /// publish the slider bounds and the filtered result.
    ///
    /// Initial state: top filter off, search terms empty, time filters narrowed
    /// to the latest time point, every attribute accepted except the excluded
    /// defaults, tag filters off with their vocabulary loaded, and every other
    /// range filter at the full extent of the records that reach it. Nothing
    /// but the time and attribute defaults hides a record.
    pub fn calibrate(&mut self) -> FilterSnapshot {
        self.reset_filters();
        self.publish_range_bounds();
        self.refresh()
    }

    fn reset_filters(&mut self) {
        let data = self.dataset.as_slice();
        let mut pipeline = self.pipeline.lock();

        if let Some(top) = pipeline.top_filter_mut() {
            top.set_active(false);
        }
        if let Some(search) = pipeline.entity_search_filter_mut() {
            search.set_term("");
        }
        if let Some(search) = pipeline.media_search_filter_mut() {
            search.set_term("");
        }

        for (_, filter) in pipeline.filters_mut() {
            match filter {
                BuiltinFilter::Range(range) if range.field() == RangeField::Time => {
                    range.calculate_min_max_values(data);
                    range.reset_to_latest(data);
                }
                BuiltinFilter::Range(_) => {}
                BuiltinFilter::Paragraph(paragraph) => {
                    paragraph.initialize_from(data, self.settings.excluded_attributes.as_slice());
                }
                BuiltinFilter::Tag(tag) => {
                    tag.set_active(false);
                    tag.reset_tags();
                    tag.load_available_tags(data);
                }
            }
        }

        // Value ranges last: their extent depends on the filters reset above
        pipeline.calibrate_value_ranges(data);
        tracing::debug!("Filters reset over {} records", data.len());
    }

    /// Run the pipeline over the full dataset and publish the result.
    pub fn refresh(&mut self) -> FilterSnapshot {
        let records = self.pipeline.perform_filters(&self.dataset);
        self.generation += 1;
        let snapshot = FilterSnapshot {
            records: Arc::new(records),
            total: self.dataset.len(),
            generation: self.generation,
        };
        tracing::debug!(
            "Run #{}: {} of {} records pass",
            snapshot.generation,
            snapshot.len(),
            snapshot.total
        );
        self.emit(FilterEvent::FilterChanged(snapshot.clone()));
        snapshot
    }

    /// Current bounds of every range filter.
    pub fn range_bounds(&self) -> Vec<RangeBounds> {
        let pipeline = self.pipeline.lock();
        pipeline
            .filters()
            .filter_map(|(id, f)| f.as_range().map(|range| (id, range)))
            .map(|(id, range)| RangeBounds {
                id,
                field: range.field(),
                min: range.min_value(),
                max: range.max_value(),
                postfix: match range.field() {
                    RangeField::Time => String::new(),
                    _ => self.labels.value_postfix().to_string(),
                },
            })
            .collect()
    }

    // ── Commands ──

    /// Handle one command. Returns `false` once the session should stop.
    pub fn handle_command(&mut self, cmd: FilterCommand) -> bool {
        match cmd {
            FilterCommand::Update(update) => {
                if let Err(e) = self.apply_update(&update) {
                    tracing::warn!("Rejected {}: {}", update.label(), e);
                    self.emit(FilterEvent::Error(e.to_string()));
                    return true;
                }
                self.refresh();
            }
            FilterCommand::CalibrateRange(id) => {
                let result = self.pipeline.lock().calibrate_range(id, &self.dataset);
                match result {
                    Ok(_) => {
                        self.publish_range_bounds();
                        self.refresh();
                    }
                    Err(e) => self.emit(FilterEvent::Error(e.to_string())),
                }
            }
            FilterCommand::ClearFilters => {
                self.log.log("clear filters", Vec::new());
                self.calibrate();
            }
            FilterCommand::PrintFilters => {
                let pipeline = self.pipeline.lock();
                pipeline.print_filters();
                let lines = pipeline.describe_filters();
                drop(pipeline);
                self.emit(FilterEvent::FiltersPrinted(lines));
            }
            FilterCommand::SubmitLog => {
                let entries = self.log.submit();
                self.emit(FilterEvent::LogSubmitted(entries));
            }
            FilterCommand::Shutdown => {
                tracing::info!("Filter session shutting down");
                self.emit(FilterEvent::Shutdown);
                return false;
            }
        }
        true
    }

    fn apply_update(&mut self, update: &FilterUpdate) -> PipelineResult<()> {
        let time_range_changed = match update {
            FilterUpdate::SetRange { id, .. } => self.is_time_range(*id),
            _ => false,
        };

        let top_deactivated = {
            let mut pipeline = self.pipeline.lock();
            pipeline.apply(update)?;
            match pipeline.top_filter_mut() {
                Some(top) if update.is_search() && top.is_active() => {
                    top.set_active(false);
                    true
                }
                _ => false,
            }
        };
        self.log.log(update.label(), update.values());

        if top_deactivated {
            tracing::debug!("Search term changed, top filter deactivated");
            self.emit(FilterEvent::TopFilterDeactivated);
        }
        if time_range_changed {
            self.pipeline.lock().calibrate_value_ranges(&self.dataset);
            self.publish_range_bounds();
        }
        Ok(())
    }

    fn is_time_range(&self, id: FilterId) -> bool {
        self.pipeline
            .lock()
            .filter(id)
            .and_then(BuiltinFilter::as_range)
            .is_some_and(|range| range.field() == RangeField::Time)
    }

    fn publish_range_bounds(&self) {
        self.emit(FilterEvent::SliderRangesChanged(self.range_bounds()));
    }

    // ── Loop ──

    /// Handle every queued command without blocking.
    ///
    /// Returns `false` once a `Shutdown` was handled.
    pub fn process_pending(&mut self) -> bool {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            if !self.handle_command(cmd) {
                return false;
            }
        }
        true
    }

    /// Block on commands until `Shutdown` arrives or the bridge is dropped.
    pub fn run(&mut self) {
        tracing::info!("Filter session started");
        while let Ok(cmd) = self.cmd_rx.recv() {
            if !self.handle_command(cmd) {
                return;
            }
        }
        tracing::info!("Filter bridge dropped, session stopped");
    }

    fn emit(&self, event: FilterEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            tracing::warn!("Dropped filter event: {}", e);
        }
    }
}

fn prepare_dataset(mut dataset: Dataset) -> Dataset {
    for side in [NodeSide::Source, NodeSide::Target] {
        normalize_tags(&mut dataset, side);
    }
    dataset
}
