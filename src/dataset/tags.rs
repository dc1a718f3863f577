//! Tag normalization.
//!
//! Tags are attached per record, but they describe nodes. Before tag filters
//! can operate, every record carrying a node name must carry the union of all
//! tags seen for that name anywhere in the dataset. This pass runs once per
//! dataset, not per query.

use crate::types::{FlowRecord, NodeSide};
use std::collections::{BTreeMap, BTreeSet};

/// Joiner used when writing a merged tag set back into a record.
pub const TAG_JOINER: &str = " | ";

/// Per-node tag sets for one side of the dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTags {
    pub side: Option<NodeSide>,
    /// Node name → union of its tags.
    pub per_node: BTreeMap<String, BTreeSet<String>>,
    /// Every tag seen on this side.
    pub vocabulary: BTreeSet<String>,
}

impl NodeTags {
    /// Merged tag string for a node, as written back into records.
    pub fn joined(&self, node: &str) -> Option<String> {
        self.per_node.get(node).map(|tags| {
            tags.iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(TAG_JOINER)
        })
    }
}

/// Group tagged records by node name and union their tags.
///
/// Records without tags on `side` are ignored.
pub fn derive_node_tags(records: &[FlowRecord], side: NodeSide) -> NodeTags {
    let mut node_tags = NodeTags {
        side: Some(side),
        ..NodeTags::default()
    };

    for record in records {
        let mut tags = record.tags(side).peekable();
        if tags.peek().is_none() {
            continue;
        }
        let entry = node_tags
            .per_node
            .entry(record.node(side).to_string())
            .or_default();
        for tag in tags {
            entry.insert(tag.to_string());
            node_tags.vocabulary.insert(tag.to_string());
        }
    }
    node_tags
}

/// Write merged tag strings back into every record whose node name matches
/// (case-insensitively) a node in `node_tags`. Returns the number of records touched.
///
/// Names that differ only in case share one tag set, the union of theirs.
pub fn apply_node_tags(records: &mut [FlowRecord], side: NodeSide, node_tags: &NodeTags) -> usize {
    let mut merged: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for (node, tags) in &node_tags.per_node {
        merged
            .entry(node.to_lowercase())
            .or_default()
            .extend(tags.iter().map(String::as_str));
    }
    let lookup: BTreeMap<String, String> = merged
        .into_iter()
        .map(|(node, tags)| (node, tags.into_iter().collect::<Vec<_>>().join(TAG_JOINER)))
        .collect();

    let mut touched = 0;
    for record in records.iter_mut() {
        if let Some(joined) = lookup.get(&record.node(side).to_lowercase()) {
            record.set_tag(side, Some(joined.clone()));
            touched += 1;
        }
    }
    touched
}

/// Derive and apply node tags for one side. Returns the tag vocabulary.
pub fn normalize_tags(records: &mut [FlowRecord], side: NodeSide) -> BTreeSet<String> {
    let node_tags = derive_node_tags(records, side);
    if node_tags.per_node.is_empty() {
        return BTreeSet::new();
    }
    let touched = apply_node_tags(records, side, &node_tags);
    tracing::debug!(
        "Normalized {} tags: {} nodes, {} records",
        side.label(),
        node_tags.per_node.len(),
        touched
    );
    node_tags.vocabulary
}
