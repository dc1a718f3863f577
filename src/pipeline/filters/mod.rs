//! Built-in filter implementations.

pub mod paragraph;
pub mod range;
pub mod search;
pub mod tag;
pub mod top;

pub use paragraph::{ParagraphFilter, DEFAULT_EXCLUDED_ATTRIBUTES};
pub use range::{node_totals, RangeField, RangeFilter};
pub use search::SearchFilter;
pub use tag::TagFilter;
pub use top::{EntityTotal, TopFilter, TopMode, DEFAULT_TOP_LIMIT};
