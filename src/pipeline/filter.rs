//! Filter abstraction for the pipeline.
//!
//! Two-layer design:
//! - **`Filter` trait**: the capability every filter kind implements:
//!   `meet_criteria` and `describe`.
//! - **`BuiltinFilter` enum**: the filter kinds that can be registered in the
//!   pipeline's generic list. Dispatch is a match, no trait objects.
//!
//! Role filters (top, entity search, media search) are held in typed slots on
//! the pipeline and never go through the enum.

use crate::pipeline::filters::{ParagraphFilter, RangeFilter, TagFilter};
use crate::types::Dataset;

/// A pure transformation over a dataset plus a diagnostic description.
pub trait Filter {
    /// Human-readable name of this filter.
    fn name(&self) -> &str;

    /// Whether the filter currently constrains its input.
    fn is_active(&self) -> bool;

    /// Keep the records that satisfy this filter, preserving input order.
    ///
    /// An inactive filter returns its input unchanged.
    fn meet_criteria(&self, records: Dataset) -> Dataset;

    /// One-line description of the current configuration.
    fn describe(&self) -> String;
}

/// Enum dispatch for filters in the generic list.
#[derive(Debug, Clone)]
pub enum BuiltinFilter {
    Range(RangeFilter),
    Paragraph(ParagraphFilter),
    Tag(TagFilter),
}

impl BuiltinFilter {
    /// Kind label used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            BuiltinFilter::Range(_) => "range",
            BuiltinFilter::Paragraph(_) => "paragraph",
            BuiltinFilter::Tag(_) => "tag",
        }
    }

    pub fn as_range(&self) -> Option<&RangeFilter> {
        match self {
            BuiltinFilter::Range(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&ParagraphFilter> {
        match self {
            BuiltinFilter::Paragraph(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&TagFilter> {
        match self {
            BuiltinFilter::Tag(f) => Some(f),
            _ => None,
        }
    }
}

impl Filter for BuiltinFilter {
    fn name(&self) -> &str {
        match self {
            BuiltinFilter::Range(f) => f.name(),
            BuiltinFilter::Paragraph(f) => f.name(),
            BuiltinFilter::Tag(f) => f.name(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            BuiltinFilter::Range(f) => f.is_active(),
            BuiltinFilter::Paragraph(f) => f.is_active(),
            BuiltinFilter::Tag(f) => f.is_active(),
        }
    }

    fn meet_criteria(&self, records: Dataset) -> Dataset {
        match self {
            BuiltinFilter::Range(f) => f.meet_criteria(records),
            BuiltinFilter::Paragraph(f) => f.meet_criteria(records),
            BuiltinFilter::Tag(f) => f.meet_criteria(records),
        }
    }

    fn describe(&self) -> String {
        match self {
            BuiltinFilter::Range(f) => f.describe(),
            BuiltinFilter::Paragraph(f) => f.describe(),
            BuiltinFilter::Tag(f) => f.describe(),
        }
    }
}

impl From<RangeFilter> for BuiltinFilter {
    fn from(filter: RangeFilter) -> Self {
        BuiltinFilter::Range(filter)
    }
}

impl From<ParagraphFilter> for BuiltinFilter {
    fn from(filter: ParagraphFilter) -> Self {
        BuiltinFilter::Paragraph(filter)
    }
}

impl From<TagFilter> for BuiltinFilter {
    fn from(filter: TagFilter) -> Self {
        BuiltinFilter::Tag(filter)
    }
}
