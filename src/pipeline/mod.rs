//! Filter pipeline.
//!
//! A dataset of flow records passes through a fixed chain of filters:
//! role filters first, then generic filters in registration order. Every
//! stage keeps only the records that satisfy it, so the output is the logical
//! AND of all active filters.
//!
//! # Architecture
//!
//! ```text
//! dataset ─► [TopFilter] ─► [EntitySearch] ─► [MediaSearch] ─► [generic 0] ─► ... ─► filtered
//! ```
//!
//! # Design
//!
//! - **Enum dispatch**: `BuiltinFilter` enum for the generic list.
//! - **Typed role slots**: top and search filters are addressed by role, not iterated.
//! - **Command updates**: filter configuration changes arrive as `FilterUpdate` values.
//! - **No caching**: every run recomputes from its input.

pub mod bridge;
pub mod command;
pub mod error;
pub mod executor;
pub mod filter;
pub mod filters;
pub mod id;

pub use bridge::{FilterBridge, FilterCommand, FilterEvent, FilterSnapshot, RangeBounds};
pub use command::FilterUpdate;
pub use error::{PipelineError, PipelineResult};
pub use executor::{FilterPipeline, PipelineBuilder, PipelineHandle, StandardFilterIds};
pub use filter::{BuiltinFilter, Filter};
pub use filters::{
    ParagraphFilter, RangeField, RangeFilter, SearchFilter, TagFilter, TopFilter, TopMode,
};
pub use id::{FilterId, FilterRole};
