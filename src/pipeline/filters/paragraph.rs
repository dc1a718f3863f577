//! ParagraphFilter: attribute filter over `attribute1`.
//!
//! Records without an attribute are not subject to this filter and always
//! pass. Records with an attribute pass only if the value is accepted, so an
//! empty accepted set excludes every attributed record.

use crate::pipeline::filter::Filter;
use crate::types::{Dataset, FlowRecord};
use std::collections::BTreeSet;

/// Attribute values hidden by default when the filter is initialized from data.
pub const DEFAULT_EXCLUDED_ATTRIBUTES: &[&str] = &["31"];

#[derive(Debug, Clone, Default)]
pub struct ParagraphFilter {
    accepted: BTreeSet<String>,
}

impl ParagraphFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted values in sorted order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.accepted.iter().map(String::as_str)
    }

    /// Replace the accepted set.
    pub fn set_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted = values.into_iter().map(Into::into).collect();
    }

    /// Clear the accepted set.
    pub fn reset_values(&mut self) {
        self.accepted.clear();
    }

    /// Accept one more value. Returns `false` if it was already accepted.
    pub fn add_value(&mut self, value: impl Into<String>) -> bool {
        self.accepted.insert(value.into())
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.accepted.contains(value)
    }

    /// Distinct attribute values in first-seen order.
    pub fn distinct_values(records: &[FlowRecord]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        records
            .iter()
            .filter_map(FlowRecord::attribute1)
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }

    /// Accept every value present in `records` except `excluded`.
    pub fn initialize_from<S: AsRef<str>>(&mut self, records: &[FlowRecord], excluded: &[S]) {
        self.set_values(
            Self::distinct_values(records)
                .into_iter()
                .filter(|v| !excluded.iter().any(|e| e.as_ref() == v)),
        );
    }
}

impl Filter for ParagraphFilter {
    fn name(&self) -> &str {
        "Paragraph Filter"
    }

    fn is_active(&self) -> bool {
        true
    }

    fn meet_criteria(&self, mut records: Dataset) -> Dataset {
        records.retain(|r| match r.attribute1() {
            None => true,
            Some(value) => self.accepted.contains(value),
        });
        records
    }

    fn describe(&self) -> String {
        let values: Vec<&str> = self.values().collect();
        format!("Paragraph Filter: {}", values.join(","))
    }
}
