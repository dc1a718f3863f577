//! Core data types for FlowVis-RS
//!
//! This module contains the record type the filter pipeline operates on and
//! its raw, not yet validated, ingestion form.
//!
//! # Main Types
//!
//! - [`FlowRecord`] - One source → target flow with a time key and a value
//! - [`RawFlowRecord`] - The record as it arrives from storage (loosely typed)
//! - [`TimeKey`] - Comparable time key, usually a quarter-year code like `20151`
//! - [`NodeSide`] - Selects the source or target half of a record
//!
//! # Validation
//!
//! Every [`FlowRecord`] is validated on construction: `valueNode` must be a
//! finite number and `timeNode` an integer. Filters can therefore compare
//! values without guarding against NaN. Deserializing a [`FlowRecord`] goes
//! through [`RawFlowRecord`] and applies the same checks.

use crate::error::FlowVisError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered collection of flow records.
pub type Dataset = Vec<FlowRecord>;

/// Separator between tags inside a tag column.
pub const TAG_SEPARATOR: char = '|';

/// Comparable time key of a flow record.
///
/// Datasets typically encode quarters as `YYYYQ` (e.g. `20151` for 2015 Q1),
/// but any integer ordering works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeKey(pub i64);

impl TimeKey {
    /// Split a quarter-year key into `(year, quarter)`.
    pub fn as_quarter(&self) -> Option<(i64, u8)> {
        if (10_000..=99_999).contains(&self.0) {
            let quarter = (self.0 % 10) as u8;
            if (1..=4).contains(&quarter) {
                return Some((self.0 / 10, quarter));
            }
        }
        None
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TimeKey {
    fn from(value: i64) -> Self {
        TimeKey(value)
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_quarter() {
            Some((year, quarter)) => write!(f, "{}Q{}", year, quarter),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Which end of a flow a filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeSide {
    /// The paying entity (`sourceNode`, `sourceTag`)
    Source,
    /// The receiving media institution (`targetNode`, `targetTag`)
    Target,
}

impl NodeSide {
    /// Short label used in filter descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            NodeSide::Source => "Entity",
            NodeSide::Target => "Media",
        }
    }
}

/// One row of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFlowRecord", into = "RawFlowRecord")]
pub struct FlowRecord {
    source_node: String,
    target_node: String,
    time_node: TimeKey,
    value_node: f64,
    source_tag: Option<String>,
    target_tag: Option<String>,
    attribute1: Option<String>,
}

impl FlowRecord {
    /// Create a validated record. Fails if `value` is not finite.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        time: impl Into<TimeKey>,
        value: f64,
    ) -> crate::Result<Self> {
        if !value.is_finite() {
            return Err(FlowVisError::InvalidRecord(format!(
                "valueNode must be finite, got {}",
                value
            )));
        }
        Ok(Self {
            source_node: source.into(),
            target_node: target.into(),
            time_node: time.into(),
            value_node: value,
            source_tag: None,
            target_tag: None,
            attribute1: None,
        })
    }

    /// Attach a pipe-delimited source tag string. Empty strings mean "no tags".
    pub fn with_source_tag(mut self, tags: impl Into<String>) -> Self {
        self.source_tag = non_empty(tags.into());
        self
    }

    /// Attach a pipe-delimited target tag string. Empty strings mean "no tags".
    pub fn with_target_tag(mut self, tags: impl Into<String>) -> Self {
        self.target_tag = non_empty(tags.into());
        self
    }

    /// Attach the categorical `attribute1` code.
    ///
    /// An empty string is kept as a code of its own, so the paragraph filter
    /// decides on it like on any other value. Only a missing attribute passes
    /// unconditionally.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute1 = Some(attribute.into());
        self
    }

    pub fn source_node(&self) -> &str {
        &self.source_node
    }

    pub fn target_node(&self) -> &str {
        &self.target_node
    }

    pub fn time_node(&self) -> TimeKey {
        self.time_node
    }

    pub fn value_node(&self) -> f64 {
        self.value_node
    }

    pub fn source_tag(&self) -> Option<&str> {
        self.source_tag.as_deref()
    }

    pub fn target_tag(&self) -> Option<&str> {
        self.target_tag.as_deref()
    }

    pub fn attribute1(&self) -> Option<&str> {
        self.attribute1.as_deref()
    }

    /// Node name on the given side.
    pub fn node(&self, side: NodeSide) -> &str {
        match side {
            NodeSide::Source => &self.source_node,
            NodeSide::Target => &self.target_node,
        }
    }

    /// Raw tag string on the given side.
    pub fn tag(&self, side: NodeSide) -> Option<&str> {
        match side {
            NodeSide::Source => self.source_tag.as_deref(),
            NodeSide::Target => self.target_tag.as_deref(),
        }
    }

    /// Individual trimmed tags on the given side.
    pub fn tags(&self, side: NodeSide) -> impl Iterator<Item = &str> {
        self.tag(side)
            .into_iter()
            .flat_map(|t| t.split(TAG_SEPARATOR))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Replace the tag string on one side. Only the dataset normalization pass uses this.
    pub(crate) fn set_tag(&mut self, side: NodeSide, tags: Option<String>) {
        let tags = tags.and_then(non_empty);
        match side {
            NodeSide::Source => self.source_tag = tags,
            NodeSide::Target => self.target_tag = tags,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A scalar cell as it arrives from storage: JSON number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    fn as_f64(&self) -> Option<f64> {
        let v = match self {
            RawValue::Int(i) => *i as f64,
            RawValue::Float(f) => *f,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Int(i) => Some(*i),
            RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            RawValue::Float(_) => None,
            RawValue::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    fn into_text(self) -> String {
        match self {
            RawValue::Int(i) => i.to_string(),
            RawValue::Float(f) => f.to_string(),
            RawValue::Text(s) => s,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Float(v) => write!(f, "{}", v),
            RawValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// Unvalidated record shape as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlowRecord {
    pub source_node: String,
    pub target_node: String,
    pub time_node: RawValue,
    pub value_node: RawValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute1: Option<RawValue>,
}

impl TryFrom<RawFlowRecord> for FlowRecord {
    type Error = FlowVisError;

    fn try_from(raw: RawFlowRecord) -> Result<Self, Self::Error> {
        let value = raw.value_node.as_f64().ok_or_else(|| {
            FlowVisError::InvalidRecord(format!(
                "valueNode {} of flow '{}' -> '{}' is not a finite number",
                raw.value_node, raw.source_node, raw.target_node
            ))
        })?;
        let time = raw.time_node.as_i64().ok_or_else(|| {
            FlowVisError::InvalidRecord(format!(
                "timeNode {} of flow '{}' -> '{}' is not an integer key",
                raw.time_node, raw.source_node, raw.target_node
            ))
        })?;

        let mut record = FlowRecord::new(raw.source_node, raw.target_node, time, value)?;
        record.source_tag = raw.source_tag.and_then(non_empty);
        record.target_tag = raw.target_tag.and_then(non_empty);
        record.attribute1 = raw.attribute1.map(RawValue::into_text);
        Ok(record)
    }
}

impl From<FlowRecord> for RawFlowRecord {
    fn from(record: FlowRecord) -> Self {
        Self {
            source_node: record.source_node,
            target_node: record.target_node,
            time_node: RawValue::Int(record.time_node.0),
            value_node: RawValue::Float(record.value_node),
            source_tag: record.source_tag,
            target_tag: record.target_tag,
            attribute1: record.attribute1.map(RawValue::Text),
        }
    }
}
