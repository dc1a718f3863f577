//! Filter configuration updates.
//!
//! The UI never mutates filters directly. Every change is expressed as a
//! `FilterUpdate` and applied to the pipeline with `FilterPipeline::apply`,
//! which keeps the update sequence auditable.

use crate::pipeline::filters::TopMode;
use crate::pipeline::id::FilterId;
use serde::{Deserialize, Serialize};

/// A single configuration change for one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterUpdate {
    /// `None` disables the top filter, `Some` activates it in that mode.
    SetTopMode(Option<TopMode>),
    SetEntitySearchTerm(String),
    SetMediaSearchTerm(String),
    SetRange { id: FilterId, min: f64, max: f64 },
    SetTagFilterActive { id: FilterId, active: bool },
    AddTag { id: FilterId, tag: String },
    ActivateTag { id: FilterId, tag: String },
    DeactivateTag { id: FilterId, tag: String },
    ResetTags { id: FilterId },
    ResetAttributes { id: FilterId },
    AddAttribute { id: FilterId, value: String },
    SetAttributes { id: FilterId, values: Vec<String> },
}

impl FilterUpdate {
    /// Short label for the interaction log.
    pub fn label(&self) -> &'static str {
        match self {
            FilterUpdate::SetTopMode(_) => "top filter",
            FilterUpdate::SetEntitySearchTerm(_) => "entity search",
            FilterUpdate::SetMediaSearchTerm(_) => "media search",
            FilterUpdate::SetRange { .. } => "range slider",
            FilterUpdate::SetTagFilterActive { .. } => "tag filter toggle",
            FilterUpdate::AddTag { .. } => "tag added",
            FilterUpdate::ActivateTag { .. } => "tag selected",
            FilterUpdate::DeactivateTag { .. } => "tag deselected",
            FilterUpdate::ResetTags { .. } => "tags reset",
            FilterUpdate::ResetAttributes { .. } => "attributes reset",
            FilterUpdate::AddAttribute { .. } => "attribute selected",
            FilterUpdate::SetAttributes { .. } => "attributes set",
        }
    }

    /// Values carried by the update, rendered for the interaction log.
    pub fn values(&self) -> Vec<String> {
        match self {
            FilterUpdate::SetTopMode(mode) => vec![mode
                .map(|m| m.display_name().to_string())
                .unwrap_or_else(|| "disabled".to_string())],
            FilterUpdate::SetEntitySearchTerm(term) | FilterUpdate::SetMediaSearchTerm(term) => {
                vec![term.clone()]
            }
            FilterUpdate::SetRange { min, max, .. } => vec![min.to_string(), max.to_string()],
            FilterUpdate::SetTagFilterActive { active, .. } => vec![active.to_string()],
            FilterUpdate::AddTag { tag, .. }
            | FilterUpdate::ActivateTag { tag, .. }
            | FilterUpdate::DeactivateTag { tag, .. } => vec![tag.clone()],
            FilterUpdate::ResetTags { .. } | FilterUpdate::ResetAttributes { .. } => Vec::new(),
            FilterUpdate::AddAttribute { value, .. } => vec![value.clone()],
            FilterUpdate::SetAttributes { values, .. } => values.clone(),
        }
    }

    /// Whether this update changes a search term.
    pub fn is_search(&self) -> bool {
        matches!(
            self,
            FilterUpdate::SetEntitySearchTerm(_) | FilterUpdate::SetMediaSearchTerm(_)
        )
    }
}
