//! Identity types for the filter pipeline.
//!
//! Generic filters are addressed by `FilterId`, a newtype over `u32` that
//! serves as a direct index into the pipeline's generic filter list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index into `FilterPipeline::filters`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterId(pub u32);

impl FilterId {
    pub const INVALID: FilterId = FilterId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "FilterId(INVALID)")
        } else {
            write!(f, "FilterId({})", self.0)
        }
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "filter #INVALID")
        } else {
            write!(f, "filter #{}", self.0)
        }
    }
}

/// Role slots that are applied before the generic filter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterRole {
    Top,
    EntitySearch,
    MediaSearch,
}

impl FilterRole {
    /// Roles in application order.
    pub const ORDER: [FilterRole; 3] = [
        FilterRole::Top,
        FilterRole::EntitySearch,
        FilterRole::MediaSearch,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterRole::Top => "Top Filter",
            FilterRole::EntitySearch => "Entity Search Filter",
            FilterRole::MediaSearch => "Media Search Filter",
        }
    }
}
