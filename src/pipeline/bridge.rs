//! Channel boundary between the filter session and the UI.
//!
//! The UI sends `FilterCommand`s and receives `FilterEvent`s. The session on
//! the other side owns the pipeline and the unfiltered dataset.

use crate::error::FlowVisError;
use crate::pipeline::command::FilterUpdate;
use crate::pipeline::filters::{RangeField, TopMode};
use crate::pipeline::id::FilterId;
use crate::session::LogEntry;
use crate::types::Dataset;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct FilterSnapshot {
    /// Filtered records, in dataset order.
    pub records: Arc<Dataset>,
    /// Size of the unfiltered dataset.
    pub total: usize,
    /// Increments with every pipeline run.
    pub generation: u64,
}

impl FilterSnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Current bounds of one range filter, for slider display.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBounds {
    pub id: FilterId,
    pub field: RangeField,
    pub min: f64,
    pub max: f64,
    /// Unit postfix taken from the column labels (e.g. "value").
    pub postfix: String,
}

/// Messages sent from the session to the UI thread.
#[derive(Debug, Clone)]
pub enum FilterEvent {
    /// The filter configuration changed and the pipeline was re-run.
    FilterChanged(FilterSnapshot),
    /// The top filter was switched off as a side effect (e.g. a search term changed).
    TopFilterDeactivated,
    /// Range filter bounds were recalibrated.
    SliderRangesChanged(Vec<RangeBounds>),
    /// Response to `PrintFilters`.
    FiltersPrinted(Vec<String>),
    /// Response to `SubmitLog`.
    LogSubmitted(Vec<LogEntry>),
    /// A command could not be applied.
    Error(String),
    /// Session is shutting down.
    Shutdown,
}

/// Commands sent from the UI thread to the session.
#[derive(Debug, Clone)]
pub enum FilterCommand {
    /// Change one filter's configuration.
    Update(FilterUpdate),
    /// Recalibrate one range filter to the full extent of the records that reach it.
    CalibrateRange(FilterId),
    /// Reset every filter to its initial state.
    ClearFilters,
    /// Request filter descriptions.
    PrintFilters,
    /// Request the interaction log.
    SubmitLog,
    /// Stop the session loop.
    Shutdown,
}

/// Channel capacity for commands (UI → session).
const CMD_CHANNEL_CAPACITY: usize = 256;
/// Channel capacity for events (session → UI).
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// UI-side handle for communicating with the filter session.
pub struct FilterBridge {
    pub cmd_tx: Sender<FilterCommand>,
    pub event_rx: Receiver<FilterEvent>,
}

impl FilterBridge {
    /// Create a new bridge pair: `(bridge_for_ui, cmd_rx, event_tx)`.
    ///
    /// The session owns `cmd_rx` and `event_tx`.
    pub fn new() -> (Self, Receiver<FilterCommand>, Sender<FilterEvent>) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = bounded(EVENT_CHANNEL_CAPACITY);
        (Self { cmd_tx, event_rx }, cmd_rx, event_tx)
    }

    // --- Events ---

    /// Drain all pending events.
    pub fn drain(&self) -> Vec<FilterEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Try to receive a single event without blocking.
    pub fn try_recv(&self) -> Option<FilterEvent> {
        self.event_rx.try_recv().ok()
    }

    // --- Commands ---

    /// Queue `cmd` for the session. Fails once the session side is gone.
    pub fn send_command(&self, cmd: FilterCommand) -> crate::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|e| FlowVisError::Channel(format!("filter session stopped: {}", e)))
    }

    pub fn update(&self, update: FilterUpdate) {
        let _ = self.cmd_tx.send(FilterCommand::Update(update));
    }

    pub fn set_top_mode(&self, mode: Option<TopMode>) {
        self.update(FilterUpdate::SetTopMode(mode));
    }

    pub fn set_entity_search_term(&self, term: impl Into<String>) {
        self.update(FilterUpdate::SetEntitySearchTerm(term.into()));
    }

    pub fn set_media_search_term(&self, term: impl Into<String>) {
        self.update(FilterUpdate::SetMediaSearchTerm(term.into()));
    }

    pub fn set_range(&self, id: FilterId, min: f64, max: f64) {
        self.update(FilterUpdate::SetRange { id, min, max });
    }

    pub fn clear_filters(&self) {
        let _ = self.cmd_tx.send(FilterCommand::ClearFilters);
    }

    pub fn print_filters(&self) {
        let _ = self.cmd_tx.send(FilterCommand::PrintFilters);
    }

    pub fn submit_log(&self) {
        let _ = self.cmd_tx.send(FilterCommand::SubmitLog);
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(FilterCommand::Shutdown);
    }
}
