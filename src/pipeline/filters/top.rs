//! TopFilter: keeps the flows of the N source entities with the highest
//! (or lowest) aggregate value.
//!
//! The ranking is computed from scratch on every call over whatever input the
//! filter receives, which is why the pipeline runs it first: it must see the
//! unfiltered per-entity totals.

use crate::pipeline::filter::Filter;
use crate::types::{Dataset, FlowRecord};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default number of entities kept by the top filter.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Which end of the ranking to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TopMode {
    /// Highest aggregate totals
    #[default]
    Top,
    /// Lowest aggregate totals
    Bottom,
}

impl TopMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            TopMode::Top => "Top",
            TopMode::Bottom => "Bottom",
        }
    }
}

/// One entity with its aggregate total.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTotal {
    pub entity: String,
    pub total: f64,
}

/// Top/bottom-N filter over `sourceNode` aggregate totals.
#[derive(Debug, Clone)]
pub struct TopFilter {
    active: bool,
    mode: TopMode,
    limit: usize,
}

impl TopFilter {
    /// Inactive filter in top mode with the default limit.
    pub fn new() -> Self {
        Self {
            active: false,
            mode: TopMode::Top,
            limit: DEFAULT_TOP_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn mode(&self) -> TopMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TopMode) {
        self.mode = mode;
    }

    /// Switch between top (`true`) and bottom (`false`) mode.
    pub fn change_filter_top(&mut self, top: bool) {
        self.mode = if top { TopMode::Top } else { TopMode::Bottom };
    }

    /// Apply a UI selection: `None` disables, `Some(mode)` activates in that mode.
    pub fn select(&mut self, mode: Option<TopMode>) {
        match mode {
            Some(mode) => {
                self.active = true;
                self.mode = mode;
            }
            None => self.active = false,
        }
    }

    /// Aggregate `valueNode` per `sourceNode`, sorted descending by total.
    ///
    /// Equal totals are ordered by entity name so the ranking is deterministic.
    pub fn rank_entities(records: &[FlowRecord]) -> Vec<EntityTotal> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for record in records {
            *totals.entry(record.source_node()).or_insert(0.0) += record.value_node();
        }

        let mut ranked: Vec<EntityTotal> = totals
            .into_iter()
            .map(|(entity, total)| EntityTotal {
                entity: entity.to_string(),
                total,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.entity.cmp(&b.entity))
        });
        ranked
    }

    /// Entities selected by the current mode, in ranking order.
    pub fn find_top(&self, records: &[FlowRecord]) -> Vec<String> {
        let ranked = Self::rank_entities(records);
        let selected = match self.mode {
            TopMode::Top => &ranked[..ranked.len().min(self.limit)],
            TopMode::Bottom => &ranked[ranked.len().saturating_sub(self.limit)..],
        };
        selected.iter().map(|e| e.entity.clone()).collect()
    }
}

impl Filter for TopFilter {
    fn name(&self) -> &str {
        "Top Filter"
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn meet_criteria(&self, mut records: Dataset) -> Dataset {
        if !self.active {
            return records;
        }

        let selected: HashSet<String> = self.find_top(&records).into_iter().collect();
        records.retain(|r| selected.contains(r.source_node()));
        records
    }

    fn describe(&self) -> String {
        if self.active {
            format!("Top Filter: {} {}", self.mode.display_name(), self.limit)
        } else {
            "Top Filter: disabled".to_string()
        }
    }
}

impl Default for TopFilter {
    fn default() -> Self {
        Self::new()
    }
}
