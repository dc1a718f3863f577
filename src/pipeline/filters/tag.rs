//! TagFilter: keeps flows whose node carries one of the selected tags.
//!
//! Every tag filter is bound to a side at construction: the entity tag filter
//! matches `sourceTag`, the media tag filter matches `targetTag`. There is no
//! side-less tag filter.
//!
//! Tags live in one of two pools: `available` (known but not selected) and
//! `active` (currently filtering). An active filter with no selected tags
//! excludes every record.

use crate::pipeline::filter::Filter;
use crate::types::{Dataset, FlowRecord, NodeSide};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct TagFilter {
    side: NodeSide,
    active: bool,
    available_tags: BTreeSet<String>,
    active_tags: BTreeSet<String>,
}

impl TagFilter {
    fn new(side: NodeSide) -> Self {
        Self {
            side,
            active: false,
            available_tags: BTreeSet::new(),
            active_tags: BTreeSet::new(),
        }
    }

    /// Tag filter over `sourceTag`.
    pub fn entity() -> Self {
        Self::new(NodeSide::Source)
    }

    /// Tag filter over `targetTag`.
    pub fn media() -> Self {
        Self::new(NodeSide::Target)
    }

    pub fn side(&self) -> NodeSide {
        self.side
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn available_tags(&self) -> &BTreeSet<String> {
        &self.available_tags
    }

    pub fn active_tags(&self) -> &BTreeSet<String> {
        &self.active_tags
    }

    /// Register a known tag in the available pool without selecting it.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.active_tags.contains(&tag) {
            self.available_tags.insert(tag);
        }
    }

    /// Move a tag into the active pool.
    pub fn activate_tag(&mut self, tag: &str) {
        self.available_tags.remove(tag);
        self.active_tags.insert(tag.to_string());
    }

    /// Move a tag back into the available pool. Returns `false` if it was not active.
    pub fn deactivate_tag(&mut self, tag: &str) -> bool {
        if self.active_tags.remove(tag) {
            self.available_tags.insert(tag.to_string());
            true
        } else {
            false
        }
    }

    /// Move every active tag back into the available pool.
    pub fn reset_tags(&mut self) {
        let active = std::mem::take(&mut self.active_tags);
        self.available_tags.extend(active);
    }

    /// Replace the vocabulary with every tag found on this filter's side of `records`.
    ///
    /// Tags that are currently active stay active.
    pub fn load_available_tags(&mut self, records: &[FlowRecord]) {
        self.available_tags = records
            .iter()
            .flat_map(|r| r.tags(self.side))
            .filter(|t| !self.active_tags.contains(*t))
            .map(str::to_string)
            .collect();
    }

    /// Tags attached to `node` anywhere in `records` (node names compared case-insensitively).
    pub fn tags_of(&self, records: &[FlowRecord], node: &str) -> BTreeSet<String> {
        let node = node.to_lowercase();
        records
            .iter()
            .filter(|r| r.node(self.side).to_lowercase() == node)
            .flat_map(|r| r.tags(self.side))
            .map(str::to_string)
            .collect()
    }

    fn matches(&self, record: &FlowRecord) -> bool {
        record.tags(self.side).any(|t| self.active_tags.contains(t))
    }
}

impl Filter for TagFilter {
    fn name(&self) -> &str {
        match self.side {
            NodeSide::Source => "Entity Tag Filter",
            NodeSide::Target => "Media Tag Filter",
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn meet_criteria(&self, mut records: Dataset) -> Dataset {
        if !self.active {
            return records;
        }
        records.retain(|r| self.matches(r));
        records
    }

    fn describe(&self) -> String {
        let tags: Vec<&str> = self.active_tags.iter().map(String::as_str).collect();
        format!(
            "{} ({}): {}",
            self.name(),
            if self.active { "active" } else { "inactive" },
            tags.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(source: &str, source_tag: &str, target: &str, target_tag: &str) -> FlowRecord {
        FlowRecord::new(source, target, 20151, 1.0)
            .unwrap()
            .with_source_tag(source_tag)
            .with_target_tag(target_tag)
    }

    fn sample() -> Vec<FlowRecord> {
        vec![
            flow("Ministry", "federal | ministry", "Daily", "print"),
            flow("City", "municipal", "Radio One", "radio | regional"),
            flow("Bank", "", "Daily", "print"),
        ]
    }

    #[test]
    fn test_inactive_is_identity() {
        let mut filter = TagFilter::entity();
        filter.activate_tag("federal");
        assert_eq!(filter.meet_criteria(sample()), sample());
    }

    #[test]
    fn test_entity_tags_match_source() {
        let mut filter = TagFilter::entity();
        filter.set_active(true);
        filter.activate_tag("municipal");
        filter.activate_tag("ministry");
        let result = filter.meet_criteria(sample());
        let sources: Vec<_> = result.iter().map(|r| r.source_node()).collect();
        assert_eq!(sources, vec!["Ministry", "City"]);
    }

    #[test]
    fn test_media_tags_match_target() {
        let mut filter = TagFilter::media();
        filter.set_active(true);
        filter.activate_tag("regional");
        let result = filter.meet_criteria(sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].target_node(), "Radio One");
    }

    #[test]
    fn test_active_with_no_tags_excludes_all() {
        let mut filter = TagFilter::media();
        filter.set_active(true);
        assert!(filter.meet_criteria(sample()).is_empty());
    }

    #[test]
    fn test_reset_round_trip() {
        let mut filter = TagFilter::entity();
        filter.load_available_tags(&sample());
        filter.set_active(true);
        filter.activate_tag("federal");
        let original = filter.meet_criteria(sample());

        filter.reset_tags();
        assert!(filter.active_tags().is_empty());
        assert!(filter.available_tags().contains("federal"));

        filter.add_tag("federal");
        filter.activate_tag("federal");
        assert_eq!(filter.meet_criteria(sample()), original);
    }

    #[test]
    fn test_pool_moves() {
        let mut filter = TagFilter::entity();
        filter.add_tag("a");
        filter.activate_tag("a");
        assert!(!filter.available_tags().contains("a"));
        // Re-registering an active tag does not duplicate it into the available pool
        filter.add_tag("a");
        assert!(!filter.available_tags().contains("a"));
        assert!(filter.deactivate_tag("a"));
        assert!(!filter.deactivate_tag("a"));
        assert!(filter.available_tags().contains("a"));
    }

    #[test]
    fn test_load_available_tags_and_tags_of() {
        let mut filter = TagFilter::media();
        filter.activate_tag("print");
        filter.load_available_tags(&sample());
        let available: Vec<_> = filter.available_tags().iter().map(String::as_str).collect();
        assert_eq!(available, vec!["radio", "regional"]);

        let tags = filter.tags_of(&sample(), "radio one");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("radio"));
    }
}
