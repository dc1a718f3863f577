//! Range filters: inclusive `[min, max]` bounds over a numeric field.
//!
//! Four fields are supported:
//!
//! - **Entity total**: aggregate `valueNode` per `sourceNode`
//! - **Media total**: aggregate `valueNode` per `targetNode`
//! - **Flow value**: the raw `valueNode` of each record
//! - **Time**: the raw `timeNode` of each record
//!
//! Aggregate fields are summed over the filter's own input, so the bounds
//! apply to totals of the data that reached this stage of the pipeline.
//!
//! `calculate_min_max_values` only calibrates the bounds (slider extents); it
//! never filters.

use crate::pipeline::filter::Filter;
use crate::types::{Dataset, FlowRecord, NodeSide, TimeKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// The numeric quantity a range filter constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeField {
    EntityTotal,
    MediaTotal,
    FlowValue,
    Time,
}

impl RangeField {
    pub fn display_name(&self) -> &'static str {
        match self {
            RangeField::EntityTotal => "Entity Euro Filter",
            RangeField::MediaTotal => "Media Euro Filter",
            RangeField::FlowValue => "Payment Euro Filter",
            RangeField::Time => "Quarter Filter",
        }
    }

    /// Whether the field is summed per node before comparison.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, RangeField::EntityTotal | RangeField::MediaTotal)
    }

    fn aggregate_side(&self) -> Option<NodeSide> {
        match self {
            RangeField::EntityTotal => Some(NodeSide::Source),
            RangeField::MediaTotal => Some(NodeSide::Target),
            RangeField::FlowValue | RangeField::Time => None,
        }
    }
}

/// Sum `valueNode` per node name on one side.
pub fn node_totals(records: &[FlowRecord], side: NodeSide) -> HashMap<&str, f64> {
    let mut totals = HashMap::new();
    for record in records {
        *totals.entry(record.node(side)).or_insert(0.0) += record.value_node();
    }
    totals
}

#[derive(Debug, Clone)]
pub struct RangeFilter {
    field: RangeField,
    min_value: f64,
    max_value: f64,
}

impl RangeFilter {
    /// Unbounded filter over `field`; behaves as a passthrough until calibrated.
    pub fn new(field: RangeField) -> Self {
        Self {
            field,
            min_value: f64::NEG_INFINITY,
            max_value: f64::INFINITY,
        }
    }

    pub fn entity_euro() -> Self {
        Self::new(RangeField::EntityTotal)
    }

    pub fn media_euro() -> Self {
        Self::new(RangeField::MediaTotal)
    }

    pub fn payment_euro() -> Self {
        Self::new(RangeField::FlowValue)
    }

    pub fn quarter() -> Self {
        Self::new(RangeField::Time)
    }

    pub fn field(&self) -> RangeField {
        self.field
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn set_min_value(&mut self, min: f64) {
        self.min_value = min;
    }

    pub fn set_max_value(&mut self, max: f64) {
        self.max_value = max;
    }

    /// Overwrite both bounds.
    pub fn change_range(&mut self, min: f64, max: f64) {
        self.min_value = min;
        self.max_value = max;
    }

    /// Whether `value` lies within the bounds (inclusive).
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value && value <= self.max_value
    }

    /// Full extent of the field over `records`, or `None` for an empty dataset.
    pub fn extent(&self, records: &[FlowRecord]) -> Option<(f64, f64)> {
        let fold = |acc: Option<(f64, f64)>, v: f64| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        };

        match self.field.aggregate_side() {
            Some(side) => node_totals(records, side).into_values().fold(None, fold),
            None => records.iter().map(|r| self.raw_value(r)).fold(None, fold),
        }
    }

    /// Set the bounds to the full extent of the field. Empty input leaves them unchanged.
    pub fn calculate_min_max_values(&mut self, records: &[FlowRecord]) -> Option<(f64, f64)> {
        let extent = self.extent(records);
        if let Some((min, max)) = extent {
            self.change_range(min, max);
        }
        extent
    }

    /// Sorted distinct time keys of a dataset.
    pub fn time_points(records: &[FlowRecord]) -> Vec<TimeKey> {
        records
            .iter()
            .map(FlowRecord::time_node)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Narrow the bounds to the latest time point in `records`.
    pub fn reset_to_latest(&mut self, records: &[FlowRecord]) {
        if let Some(latest) = Self::time_points(records).last() {
            let latest = latest.value() as f64;
            self.change_range(latest, latest);
        }
    }

    fn raw_value(&self, record: &FlowRecord) -> f64 {
        match self.field {
            RangeField::Time => record.time_node().value() as f64,
            _ => record.value_node(),
        }
    }

    fn is_unbounded(&self) -> bool {
        self.min_value == f64::NEG_INFINITY && self.max_value == f64::INFINITY
    }
}

impl Filter for RangeFilter {
    fn name(&self) -> &str {
        self.field.display_name()
    }

    fn is_active(&self) -> bool {
        !self.is_unbounded()
    }

    fn meet_criteria(&self, mut records: Dataset) -> Dataset {
        if self.is_unbounded() {
            return records;
        }

        match self.field.aggregate_side() {
            Some(side) => {
                let included: BTreeSet<String> = node_totals(&records, side)
                    .into_iter()
                    .filter(|(_, total)| self.contains(*total))
                    .map(|(node, _)| node.to_string())
                    .collect();
                records.retain(|r| included.contains(r.node(side)));
            }
            None => records.retain(|r| self.contains(self.raw_value(r))),
        }
        records
    }

    fn describe(&self) -> String {
        if self.is_unbounded() {
            return format!("{}: unbounded", self.name());
        }
        let bound = |value: f64| match self.field {
            RangeField::Time if value.is_finite() => TimeKey(value as i64).to_string(),
            _ => value.to_string(),
        };
        format!(
            "{}: {} - {}",
            self.name(),
            bound(self.min_value),
            bound(self.max_value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(source: &str, target: &str, time: i64, value: f64) -> FlowRecord {
        FlowRecord::new(source, target, time, value).unwrap()
    }

    fn sample() -> Vec<FlowRecord> {
        vec![
            flow("A", "X", 20151, 100.0),
            flow("A", "Y", 20152, 50.0),
            flow("B", "X", 20152, 90.0),
            flow("C", "Y", 20153, 10.0),
        ]
    }

    #[test]
    fn test_uncalibrated_is_identity() {
        for filter in [
            RangeFilter::entity_euro(),
            RangeFilter::media_euro(),
            RangeFilter::payment_euro(),
            RangeFilter::quarter(),
        ] {
            assert!(!filter.is_active());
            assert_eq!(filter.meet_criteria(sample()), sample());
        }
    }

    #[test]
    fn test_flow_value_bounds_inclusive() {
        let mut filter = RangeFilter::payment_euro();
        filter.change_range(50.0, 100.0);
        let values: Vec<_> = filter
            .meet_criteria(sample())
            .iter()
            .map(|r| r.value_node())
            .collect();
        assert_eq!(values, vec![100.0, 50.0, 90.0]);
    }

    #[test]
    fn test_entity_totals() {
        // A = 150, B = 90, C = 10
        let mut filter = RangeFilter::entity_euro();
        filter.change_range(90.0, 150.0);
        let result = filter.meet_criteria(sample());
        let sources: Vec<_> = result.iter().map(|r| r.source_node()).collect();
        assert_eq!(sources, vec!["A", "A", "B"]);
    }

    #[test]
    fn test_media_totals() {
        // X = 190, Y = 60
        let mut filter = RangeFilter::media_euro();
        filter.change_range(0.0, 60.0);
        let result = filter.meet_criteria(sample());
        assert!(result.iter().all(|r| r.target_node() == "Y"));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_calculate_min_max_values() {
        let mut entity = RangeFilter::entity_euro();
        assert_eq!(entity.calculate_min_max_values(&sample()), Some((10.0, 150.0)));
        assert_eq!((entity.min_value(), entity.max_value()), (10.0, 150.0));

        let mut value = RangeFilter::payment_euro();
        value.calculate_min_max_values(&sample());
        assert_eq!((value.min_value(), value.max_value()), (10.0, 100.0));

        // Calibrated to the full extent, nothing is removed
        assert_eq!(entity.meet_criteria(sample()), sample());
        assert_eq!(value.meet_criteria(sample()), sample());
    }

    #[test]
    fn test_calculate_on_empty_keeps_bounds() {
        let mut filter = RangeFilter::payment_euro();
        filter.change_range(1.0, 2.0);
        assert_eq!(filter.calculate_min_max_values(&[]), None);
        assert_eq!((filter.min_value(), filter.max_value()), (1.0, 2.0));
    }

    #[test]
    fn test_time_points_and_latest() {
        let data = sample();
        assert_eq!(
            RangeFilter::time_points(&data),
            vec![TimeKey(20151), TimeKey(20152), TimeKey(20153)]
        );

        let mut filter = RangeFilter::quarter();
        filter.reset_to_latest(&data);
        let result = filter.meet_criteria(data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source_node(), "C");
        assert_eq!(filter.describe(), "Quarter Filter: 2015Q3 - 2015Q3");
    }

    #[test]
    fn test_inverted_range_excludes_all() {
        let mut filter = RangeFilter::payment_euro();
        filter.change_range(100.0, 10.0);
        assert!(filter.meet_criteria(sample()).is_empty());
    }

    #[test]
    fn test_describe_unbounded() {
        assert_eq!(RangeFilter::quarter().describe(), "Quarter Filter: unbounded");
        assert_eq!(RangeFilter::payment_euro().describe(), "Payment Euro Filter: unbounded");

        let mut filter = RangeFilter::quarter();
        filter.set_max_value(20152.0);
        assert_eq!(filter.describe(), "Quarter Filter: -inf - 2015Q2");
    }
}
