//! Interactive dashboard state.
//!
//! A [`DashboardSession`] owns the dataset cache, the current
//! [`FilterSelection`] and the [`DashboardView`] computed from them. Every
//! mutation recomputes the whole view from the filtered rows.

use chrono::NaiveDate;
use regtrend_core::error::Result;
use regtrend_core::models::Category;
use regtrend_core::settings::Settings;
use regtrend_data::aggregator::{
    CategorySeries, GrowthRow, RegistrationAggregator, SeriesPoint, YearPivot,
};
use regtrend_data::dataset::{DashboardRow, Dataset};
use regtrend_data::filter::{FilterSelection, SelectionScope};

use crate::cache::DatasetCache;

// ── DashboardView ─────────────────────────────────────────────────────────────

/// Every aggregate the dashboard renders, for one filter selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub total_by_date: Vec<SeriesPoint>,
    pub by_category: Vec<CategorySeries>,
    pub yearly: Vec<GrowthRow>,
    pub quarterly: Vec<GrowthRow>,
    pub category_pivot: YearPivot,
    pub maker_pivot: YearPivot,
    /// Rows that passed the filter.
    pub row_count: usize,
    pub total_registrations: i64,
}

impl DashboardView {
    pub fn compute(rows: &[&DashboardRow]) -> Self {
        Self {
            total_by_date: RegistrationAggregator::total_by_date(rows),
            by_category: RegistrationAggregator::by_date_category(rows),
            yearly: RegistrationAggregator::yearly_totals(rows),
            quarterly: RegistrationAggregator::quarterly_totals(rows),
            category_pivot: RegistrationAggregator::category_year_pivot(rows),
            maker_pivot: RegistrationAggregator::maker_year_pivot(rows),
            row_count: rows.len(),
            total_registrations: rows.iter().map(|r| r.count()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

// ── InitialFilters ────────────────────────────────────────────────────────────

/// Filter overrides given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialFilters {
    /// Empty keeps every category.
    pub categories: Vec<Category>,
    pub makers: Vec<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl InitialFilters {
    pub fn apply(&self, defaults: FilterSelection) -> FilterSelection {
        defaults
            .with_categories(self.categories.iter().copied())
            .with_makers(self.makers.iter().cloned())
            .with_range(self.from, self.to)
    }
}

impl From<&Settings> for InitialFilters {
    fn from(s: &Settings) -> Self {
        Self {
            categories: s.categories.clone(),
            makers: s.makers.clone(),
            from: s.from,
            to: s.to,
        }
    }
}

// ── DashboardSession ──────────────────────────────────────────────────────────

pub struct DashboardSession {
    cache: DatasetCache,
    /// All distinct makers, the options of the maker picker.
    makers: Vec<String>,
    selection: FilterSelection,
    view: DashboardView,
}

impl DashboardSession {
    /// Load the dataset through `cache` and compute the first view.
    pub fn open(mut cache: DatasetCache, initial: &InitialFilters) -> Result<Self> {
        let dataset = cache.get()?;
        let selection = initial.apply(FilterSelection::defaults_for(dataset));
        let makers = dataset.makers();
        let view = DashboardView::compute(&selection.apply(dataset));
        tracing::info!(
            rows = view.row_count,
            makers = makers.len(),
            "dashboard session opened"
        );
        Ok(Self {
            cache,
            makers,
            selection,
            view,
        })
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn makers(&self) -> &[String] {
        &self.makers
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.cache.cached()
    }

    /// Earliest and latest month in the whole dataset.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.dataset().and_then(Dataset::date_span)
    }

    // ── Interactions ──────────────────────────────────────────────────────

    pub fn toggle_category(&mut self, category: Category) {
        self.selection.toggle_category(category);
        self.recompute();
    }

    pub fn toggle_maker(&mut self, maker: &str) {
        self.selection.toggle_maker(maker);
        self.recompute();
    }

    pub fn clear_makers(&mut self) {
        self.selection.clear_makers();
        self.recompute();
    }

    pub fn shift_start(&mut self, months: i32) {
        if let Some(span) = self.date_span() {
            self.selection.shift_start(months, span);
            self.recompute();
        }
    }

    pub fn shift_end(&mut self, months: i32) {
        if let Some(span) = self.date_span() {
            self.selection.shift_end(months, span);
            self.recompute();
        }
    }

    /// Back to every category, no maker restriction and the full span.
    pub fn reset(&mut self) {
        if let Some(dataset) = self.cache.cached() {
            self.selection = FilterSelection::defaults_for(dataset);
        }
        self.recompute();
    }

    /// Pick up a rewritten interchange file.
    ///
    /// The selection is rebased onto the new data so added years and
    /// categories show up. Returns `true` when the file was actually reparsed.
    pub fn reload(&mut self) -> Result<bool> {
        let before = self.cache.load_count();
        let scope = self
            .cache
            .cached()
            .map(SelectionScope::of)
            .unwrap_or_default();
        self.cache.get()?;
        let reloaded = self.cache.load_count() != before;
        if let Some(dataset) = self.cache.cached().filter(|_| reloaded) {
            self.makers = dataset.makers();
            self.selection = self.selection.rebase(&scope, dataset);
            tracing::info!(rows = dataset.len(), "interchange file changed; reloaded");
        }
        self.recompute();
        Ok(reloaded)
    }

    fn recompute(&mut self) {
        self.view = match self.cache.cached() {
            Some(dataset) => DashboardView::compute(&self.selection.apply(dataset)),
            None => DashboardView::default(),
        };
        tracing::debug!(rows = self.view.row_count, "dashboard view recomputed");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
