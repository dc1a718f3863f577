//! Filter pipeline executor.
//!
//! `perform_filters` applies the filters in a fixed order, each stage
//! receiving the previous stage's output:
//! 1. Top filter (aggregates over the unfiltered data, so it must run first).
//! 2. Entity search filter.
//! 3. Media search filter.
//! 4. Generic filters in registration order.
//!
//! Unbound role filters are skipped and inactive filters pass their input
//! through, so the result is the logical AND of every active filter.

use crate::config::FilterSettings;
use crate::pipeline::command::FilterUpdate;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::filter::{BuiltinFilter, Filter};
use crate::pipeline::filters::{
    ParagraphFilter, RangeField, RangeFilter, SearchFilter, TagFilter, TopFilter,
};
use crate::pipeline::id::{FilterId, FilterRole};
use crate::types::{Dataset, FlowRecord, NodeSide};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// The ordered, AND-composed set of filters.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    top_filter: Option<TopFilter>,
    entity_search_filter: Option<SearchFilter>,
    media_search_filter: Option<SearchFilter>,
    filters: Vec<BuiltinFilter>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide pipeline handle, created on first call.
    ///
    /// Every call returns a handle to the same pipeline. Prefer constructing a
    /// pipeline explicitly and passing its handle where it is needed.
    pub fn get_instance() -> PipelineHandle {
        static INSTANCE: OnceLock<PipelineHandle> = OnceLock::new();
        INSTANCE.get_or_init(PipelineHandle::default).clone()
    }

    // ── Registration ──

    /// Append a filter to the generic list. Returns its id.
    pub fn add_filter(&mut self, filter: impl Into<BuiltinFilter>) -> FilterId {
        let filter = filter.into();
        let id = FilterId(self.filters.len() as u32);
        tracing::debug!("Registered {} as {}", filter.name(), id);
        self.filters.push(filter);
        id
    }

    /// Replace the bound top filter.
    pub fn change_top_filter(&mut self, filter: TopFilter) {
        self.top_filter = Some(filter);
    }

    /// Replace the bound entity search filter.
    pub fn change_entity_search_filter(&mut self, filter: SearchFilter) {
        debug_assert_eq!(filter.side(), NodeSide::Source);
        self.entity_search_filter = Some(filter);
    }

    /// Replace the bound media search filter.
    pub fn change_media_search_filter(&mut self, filter: SearchFilter) {
        debug_assert_eq!(filter.side(), NodeSide::Target);
        self.media_search_filter = Some(filter);
    }

    // ── Accessors ──

    pub fn top_filter(&self) -> Option<&TopFilter> {
        self.top_filter.as_ref()
    }

    pub fn top_filter_mut(&mut self) -> Option<&mut TopFilter> {
        self.top_filter.as_mut()
    }

    pub fn entity_search_filter(&self) -> Option<&SearchFilter> {
        self.entity_search_filter.as_ref()
    }

    pub fn entity_search_filter_mut(&mut self) -> Option<&mut SearchFilter> {
        self.entity_search_filter.as_mut()
    }

    pub fn media_search_filter(&self) -> Option<&SearchFilter> {
        self.media_search_filter.as_ref()
    }

    pub fn media_search_filter_mut(&mut self) -> Option<&mut SearchFilter> {
        self.media_search_filter.as_mut()
    }

    pub fn filter(&self, id: FilterId) -> Option<&BuiltinFilter> {
        self.filters.get(id.index())
    }

    pub fn filter_mut(&mut self, id: FilterId) -> Option<&mut BuiltinFilter> {
        self.filters.get_mut(id.index())
    }

    /// Generic filters with their ids, in application order.
    pub fn filters(&self) -> impl Iterator<Item = (FilterId, &BuiltinFilter)> {
        self.filters
            .iter()
            .enumerate()
            .map(|(i, f)| (FilterId(i as u32), f))
    }

    /// Generic filters with their ids, mutable.
    pub fn filters_mut(&mut self) -> impl Iterator<Item = (FilterId, &mut BuiltinFilter)> {
        self.filters
            .iter_mut()
            .enumerate()
            .map(|(i, f)| (FilterId(i as u32), f))
    }

    /// Number of bound role filters plus generic filters.
    pub fn filter_count(&self) -> usize {
        let roles = [
            self.top_filter.is_some(),
            self.entity_search_filter.is_some(),
            self.media_search_filter.is_some(),
        ];
        roles.iter().filter(|b| **b).count() + self.filters.len()
    }

    // ── Execution ──

    /// Apply every filter in order to a copy of `dataset`.
    pub fn perform_filters(&self, dataset: &[FlowRecord]) -> Dataset {
        self.perform_filters_owned(dataset.to_vec())
    }

    /// Apply every filter in order, consuming `dataset`.
    pub fn perform_filters_owned(&self, data: Dataset) -> Dataset {
        let input_len = data.len();

        let mut data = self.run_roles(data);
        for filter in &self.filters {
            data = run_stage(filter, data);
        }

        tracing::debug!(
            input = input_len,
            output = data.len(),
            "Performed {} filters",
            self.filter_count()
        );
        data
    }

    /// Records that reach generic filter `id` when `dataset` is filtered.
    ///
    /// Every other value range (any range that is not over time) is treated as
    /// unbounded, so value ranges can be calibrated in any order.
    pub fn stage_input(&self, id: FilterId, dataset: &[FlowRecord]) -> PipelineResult<Dataset> {
        if id.index() >= self.filters.len() {
            return Err(PipelineError::UnknownFilter(id));
        }
        let upstream = &self.filters[..id.index()];

        let mut data = self.run_roles(dataset.to_vec());
        for filter in upstream {
            match filter {
                BuiltinFilter::Range(range) if range.field() != RangeField::Time => {}
                _ => data = run_stage(filter, data),
            }
        }
        Ok(data)
    }

    /// Set range filter `id` to the full extent of the records that reach it.
    ///
    /// Returns the new bounds, or `None` if no record reaches the filter and
    /// the bounds were left unchanged.
    pub fn calibrate_range(
        &mut self,
        id: FilterId,
        dataset: &[FlowRecord],
    ) -> PipelineResult<Option<(f64, f64)>> {
        self.range_mut(id)?;
        let input = self.stage_input(id, dataset)?;
        let extent = self.range_mut(id)?.calculate_min_max_values(&input);
        tracing::trace!("Calibrated {} over {} records: {:?}", id, input.len(), extent);
        Ok(extent)
    }

    /// Calibrate every range filter that is not over time. See [`Self::calibrate_range`].
    pub fn calibrate_value_ranges(&mut self, dataset: &[FlowRecord]) {
        let ids: Vec<FilterId> = self
            .filters()
            .filter(|(_, f)| f.as_range().is_some_and(|r| r.field() != RangeField::Time))
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            if let Err(e) = self.calibrate_range(id, dataset) {
                tracing::warn!("Skipped calibration of {}: {}", id, e);
            }
        }
    }

    fn run_roles(&self, mut data: Dataset) -> Dataset {
        if let Some(top) = &self.top_filter {
            data = run_stage(top, data);
        }
        if let Some(search) = &self.entity_search_filter {
            data = run_stage(search, data);
        }
        if let Some(search) = &self.media_search_filter {
            data = run_stage(search, data);
        }
        data
    }

    /// Descriptions of every filter in application order, preceded by the count.
    pub fn describe_filters(&self) -> Vec<String> {
        let mut lines = vec![format!("Filter Count: {}", self.filter_count())];
        if let Some(top) = &self.top_filter {
            lines.push(top.describe());
        }
        if let Some(search) = &self.entity_search_filter {
            lines.push(search.describe());
        }
        if let Some(search) = &self.media_search_filter {
            lines.push(search.describe());
        }
        lines.extend(self.filters.iter().map(Filter::describe));
        lines
    }

    /// Write every filter description to the log.
    pub fn print_filters(&self) {
        for line in self.describe_filters() {
            tracing::info!("{}", line);
        }
    }

    // ── Commands ──

    /// Apply a configuration update to the addressed filter.
    pub fn apply(&mut self, update: &FilterUpdate) -> PipelineResult<()> {
        tracing::trace!("Applying {:?}", update);
        match update {
            FilterUpdate::SetTopMode(mode) => {
                self.top_filter
                    .as_mut()
                    .ok_or(PipelineError::RoleNotBound(FilterRole::Top))?
                    .select(*mode);
            }
            FilterUpdate::SetEntitySearchTerm(term) => {
                self.entity_search_filter
                    .as_mut()
                    .ok_or(PipelineError::RoleNotBound(FilterRole::EntitySearch))?
                    .set_term(term.clone());
            }
            FilterUpdate::SetMediaSearchTerm(term) => {
                self.media_search_filter
                    .as_mut()
                    .ok_or(PipelineError::RoleNotBound(FilterRole::MediaSearch))?
                    .set_term(term.clone());
            }
            FilterUpdate::SetRange { id, min, max } => {
                if min > max {
                    return Err(PipelineError::InvalidRange {
                        min: *min,
                        max: *max,
                    });
                }
                self.range_mut(*id)?.change_range(*min, *max);
            }
            FilterUpdate::SetTagFilterActive { id, active } => {
                self.tag_mut(*id)?.set_active(*active);
            }
            FilterUpdate::AddTag { id, tag } => self.tag_mut(*id)?.add_tag(tag.clone()),
            FilterUpdate::ActivateTag { id, tag } => self.tag_mut(*id)?.activate_tag(tag),
            FilterUpdate::DeactivateTag { id, tag } => {
                self.tag_mut(*id)?.deactivate_tag(tag);
            }
            FilterUpdate::ResetTags { id } => self.tag_mut(*id)?.reset_tags(),
            FilterUpdate::ResetAttributes { id } => self.paragraph_mut(*id)?.reset_values(),
            FilterUpdate::AddAttribute { id, value } => {
                self.paragraph_mut(*id)?.add_value(value.clone());
            }
            FilterUpdate::SetAttributes { id, values } => {
                self.paragraph_mut(*id)?.set_values(values.iter().cloned());
            }
        }
        Ok(())
    }

    pub fn range_mut(&mut self, id: FilterId) -> PipelineResult<&mut RangeFilter> {
        match self.lookup_mut(id)? {
            BuiltinFilter::Range(f) => Ok(f),
            other => Err(mismatch(id, "range", other)),
        }
    }

    pub fn paragraph_mut(&mut self, id: FilterId) -> PipelineResult<&mut ParagraphFilter> {
        match self.lookup_mut(id)? {
            BuiltinFilter::Paragraph(f) => Ok(f),
            other => Err(mismatch(id, "paragraph", other)),
        }
    }

    pub fn tag_mut(&mut self, id: FilterId) -> PipelineResult<&mut TagFilter> {
        match self.lookup_mut(id)? {
            BuiltinFilter::Tag(f) => Ok(f),
            other => Err(mismatch(id, "tag", other)),
        }
    }

    fn lookup_mut(&mut self, id: FilterId) -> PipelineResult<&mut BuiltinFilter> {
        self.filters
            .get_mut(id.index())
            .ok_or(PipelineError::UnknownFilter(id))
    }
}

fn run_stage<F: Filter>(filter: &F, data: Dataset) -> Dataset {
    let before = data.len();
    let data = filter.meet_criteria(data);
    tracing::trace!("{}: {} -> {} records", filter.name(), before, data.len());
    data
}

fn mismatch(id: FilterId, expected: &'static str, actual: &BuiltinFilter) -> PipelineError {
    PipelineError::FilterKindMismatch {
        id,
        expected,
        actual: actual.kind(),
    }
}

/// Shared handle to a pipeline.
///
/// Clones refer to the same pipeline, so configuration changes made through
/// one handle are visible through every other.
#[derive(Debug, Clone, Default)]
pub struct PipelineHandle(Arc<Mutex<FilterPipeline>>);

impl PipelineHandle {
    pub fn new(pipeline: FilterPipeline) -> Self {
        Self(Arc::new(Mutex::new(pipeline)))
    }

    /// Lock the pipeline. A poisoned lock is recovered since filters hold no invariants
    /// that a panic could break halfway.
    pub fn lock(&self) -> MutexGuard<'_, FilterPipeline> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn perform_filters(&self, dataset: &[FlowRecord]) -> Dataset {
        self.lock().perform_filters(dataset)
    }

    pub fn apply(&self, update: &FilterUpdate) -> PipelineResult<()> {
        self.lock().apply(update)
    }

    /// Whether both handles point to the same pipeline.
    pub fn ptr_eq(&self, other: &PipelineHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Ids of the generic filters registered by [`PipelineBuilder::build_default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFilterIds {
    pub quarter: FilterId,
    pub paragraph: FilterId,
    pub entity_euro: FilterId,
    pub media_euro: FilterId,
    pub payment_euro: FilterId,
    pub entity_tag: FilterId,
    pub media_tag: FilterId,
}

/// Builder for the default set of filters.
pub struct PipelineBuilder {
    settings: FilterSettings,
}

impl PipelineBuilder {
    pub fn new(settings: FilterSettings) -> Self {
        Self { settings }
    }

    /// Build the default pipeline:
    /// ```text
    /// Top → EntitySearch → MediaSearch
    ///     → Quarter → Paragraph → EntityEuro → MediaEuro → PaymentEuro
    ///     → EntityTag → MediaTag
    /// ```
    /// The paragraph and range filters need calibrating against a dataset
    /// before use (see `FilterSession::calibrate`).
    pub fn build_default(&self) -> (FilterPipeline, StandardFilterIds) {
        let mut pipeline = FilterPipeline::new();
        pipeline.change_top_filter(TopFilter::new().with_limit(self.settings.top_limit));
        pipeline.change_entity_search_filter(SearchFilter::entity());
        pipeline.change_media_search_filter(SearchFilter::media());

        let ids = StandardFilterIds {
            quarter: pipeline.add_filter(RangeFilter::quarter()),
            paragraph: pipeline.add_filter(ParagraphFilter::new()),
            entity_euro: pipeline.add_filter(RangeFilter::entity_euro()),
            media_euro: pipeline.add_filter(RangeFilter::media_euro()),
            payment_euro: pipeline.add_filter(RangeFilter::payment_euro()),
            entity_tag: pipeline.add_filter(TagFilter::entity()),
            media_tag: pipeline.add_filter(TagFilter::media()),
        };

        tracing::debug!("Built default pipeline with {} filters", pipeline.filter_count());
        (pipeline, ids)
    }
}
