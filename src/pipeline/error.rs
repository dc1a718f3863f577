//! Pipeline-specific error types.

use crate::pipeline::id::{FilterId, FilterRole};
use thiserror::Error;

/// Errors raised while routing commands to filters.
///
/// Filtering itself cannot fail; these only cover addressing mistakes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Unknown {0}")]
    UnknownFilter(FilterId),

    #[error("{id} is a {actual} filter, expected {expected}")]
    FilterKindMismatch {
        id: FilterId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{} is not bound", .0.display_name())]
    RoleNotBound(FilterRole),

    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
