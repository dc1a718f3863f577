//! Search filters: case-insensitive substring match on node names.
//!
//! The entity search looks at `sourceNode`, the media search at `targetNode`.
//! An empty term turns the filter into a passthrough.

use crate::pipeline::filter::Filter;
use crate::types::{Dataset, NodeSide};

/// Literal substring search over one side of each flow.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    side: NodeSide,
    term: String,
}

impl SearchFilter {
    /// Search over `sourceNode`.
    pub fn entity() -> Self {
        Self {
            side: NodeSide::Source,
            term: String::new(),
        }
    }

    /// Search over `targetNode`.
    pub fn media() -> Self {
        Self {
            side: NodeSide::Target,
            term: String::new(),
        }
    }

    pub fn side(&self) -> NodeSide {
        self.side
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    /// Whether a single node name matches the current term.
    pub fn matches(&self, node: &str) -> bool {
        self.term.is_empty() || node.to_lowercase().contains(&self.term.to_lowercase())
    }
}

impl Filter for SearchFilter {
    fn name(&self) -> &str {
        match self.side {
            NodeSide::Source => "Entity Search Filter",
            NodeSide::Target => "Media Search Filter",
        }
    }

    fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    fn meet_criteria(&self, mut records: Dataset) -> Dataset {
        if self.term.is_empty() {
            return records;
        }

        let term = self.term.to_lowercase();
        records.retain(|r| r.node(self.side).to_lowercase().contains(&term));
        records
    }

    fn describe(&self) -> String {
        format!("{}: {}", self.name(), self.term)
    }
}
