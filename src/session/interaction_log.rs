//! Interaction log.
//!
//! Every filter change made through the session is recorded with a UTC
//! timestamp, a label naming the change and the values it carried.
//! `submit` emits the collected entries through `tracing` and hands them back
//! to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub values: Vec<String>,
}

impl LogEntry {
    pub fn new(label: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            label: label.into(),
            values,
        }
    }
}

/// Append-only list of interactions since the last `clear`.
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    entries: Vec<LogEntry>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an interaction.
    pub fn log(&mut self, label: impl Into<String>, values: Vec<String>) {
        let entry = LogEntry::new(label, values);
        tracing::debug!("Interaction '{}': {:?}", entry.label, entry.values);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Emit every entry at INFO and return a copy of them. The log is kept.
    pub fn submit(&self) -> Vec<LogEntry> {
        tracing::info!("Submitting {} interaction(s)", self.entries.len());
        for entry in &self.entries {
            tracing::info!(
                "{} {}: {}",
                entry.timestamp.to_rfc3339(),
                entry.label,
                entry.values.join(", ")
            );
        }
        self.entries.clone()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
