//! User filter state and row selection.

use std::collections::BTreeSet;

use chrono::{Months, NaiveDate};
use regtrend_core::models::Category;

use crate::dataset::{DashboardRow, Dataset};

/// The categories and date span a selection was made against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionScope {
    pub categories: BTreeSet<Category>,
    pub span: Option<(NaiveDate, NaiveDate)>,
}

impl SelectionScope {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            categories: dataset.categories().into_iter().collect(),
            span: dataset.date_span(),
        }
    }
}

/// Current category, manufacturer and date-range selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub categories: BTreeSet<Category>,
    /// Empty means no manufacturer restriction.
    pub makers: BTreeSet<String>,
    /// Inclusive lower bound.
    pub start: NaiveDate,
    /// Inclusive upper bound.
    pub end: NaiveDate,
}

impl FilterSelection {
    /// Every category present, no maker restriction, full date span.
    pub fn defaults_for(dataset: &Dataset) -> Self {
        let (start, end) = dataset
            .date_span()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        Self {
            categories: dataset.categories().into_iter().collect(),
            makers: BTreeSet::new(),
            start,
            end,
        }
    }

    /// Replace the category set; an empty iterator leaves it unchanged.
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        let chosen: BTreeSet<Category> = categories.into_iter().collect();
        if !chosen.is_empty() {
            self.categories = chosen;
        }
        self
    }

    pub fn with_makers(mut self, makers: impl IntoIterator<Item = String>) -> Self {
        self.makers = makers.into_iter().collect();
        self
    }

    /// Override either bound of the date range.
    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        if let Some(s) = start {
            self.start = s;
        }
        if let Some(e) = end {
            self.end = e;
        }
        self
    }

    /// Category in set, maker unrestricted or selected, date within range.
    pub fn matches(&self, row: &DashboardRow) -> bool {
        self.categories.contains(&row.category)
            && (self.makers.is_empty() || self.makers.contains(&row.maker))
            && row.date >= self.start
            && row.date <= self.end
    }

    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a DashboardRow> {
        dataset.rows().iter().filter(|r| self.matches(r)).collect()
    }

    pub fn toggle_category(&mut self, category: Category) {
        if !self.categories.remove(&category) {
            self.categories.insert(category);
        }
    }

    pub fn toggle_maker(&mut self, maker: &str) {
        if !self.makers.remove(maker) {
            self.makers.insert(maker.to_string());
        }
    }

    pub fn clear_makers(&mut self) {
        self.makers.clear();
    }

    /// Carry this selection over to a reloaded `dataset`.
    ///
    /// Categories switched off in `previous` stay off, categories new to
    /// `dataset` are switched on, and makers that disappeared are dropped.
    /// A bound resting on the edge of the old span follows the new edge; a
    /// moved bound is kept, clamped to the new span.
    pub fn rebase(&self, previous: &SelectionScope, dataset: &Dataset) -> Self {
        let defaults = Self::defaults_for(dataset);
        let categories = defaults
            .categories
            .iter()
            .copied()
            .filter(|c| self.categories.contains(c) || !previous.categories.contains(c))
            .collect();
        let present: BTreeSet<String> = dataset.makers().into_iter().collect();
        let makers = self.makers.intersection(&present).cloned().collect();

        let (start, end) = match (previous.span, dataset.date_span()) {
            (Some((old_lo, old_hi)), Some((lo, hi))) => {
                let start = if self.start <= old_lo { lo } else { self.start.clamp(lo, hi) };
                let end = if self.end >= old_hi { hi } else { self.end.clamp(lo, hi) };
                if start <= end {
                    (start, end)
                } else {
                    (lo, hi)
                }
            }
            _ => (defaults.start, defaults.end),
        };

        Self {
            categories,
            makers,
            start,
            end,
        }
    }

    /// Move the start bound by `months`, staying within `span` and not past
    /// the end bound.
    pub fn shift_start(&mut self, months: i32, span: (NaiveDate, NaiveDate)) {
        let moved = shift_months(self.start, months).unwrap_or(self.start);
        let hi = self.end.min(span.1);
        self.start = moved.clamp(span.0.min(hi), hi);
    }

    /// Move the end bound by `months`, staying within `span` and not before
    /// the start bound.
    pub fn shift_end(&mut self, months: i32, span: (NaiveDate, NaiveDate)) {
        let moved = shift_months(self.end, months).unwrap_or(self.end);
        let lo = self.start.max(span.0);
        self.end = moved.clamp(lo, span.1.max(lo));
    }
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrend_core::models::{Month, RegistrationRecord};

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn dataset() -> Dataset {
        let mut records = Vec::new();
        for (maker, cat) in [
            ("ABZO", Category::TwoWheeler),
            ("AAHANA", Category::ThreeWheeler),
            ("KIA", Category::FourWheeler),
        ] {
            for (year, month) in [(2023, Month::Jan), (2023, Month::Jun), (2024, Month::Jan)] {
                records.push(RegistrationRecord {
                    maker: maker.to_string(),
                    month,
                    registrations: Some(10),
                    year,
                    category: Some(cat),
                });
            }
        }
        Dataset::from_records(records)
    }

    #[test]
    fn test_defaults_select_everything() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds);
        assert_eq!(sel.categories.len(), 3);
        assert!(sel.makers.is_empty());
        assert_eq!((sel.start, sel.end), (ymd(2023, 1), ymd(2024, 1)));
        assert_eq!(sel.apply(&ds).len(), ds.len());
    }

    #[test]
    fn test_single_category_without_maker_restriction() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds).with_categories([Category::TwoWheeler]);
        let rows = sel.apply(&ds);
        assert!(!rows.is_empty());
        assert!(rows.len() <= ds.len());
        assert!(rows.iter().all(|r| r.category == Category::TwoWheeler));
    }

    #[test]
    fn test_maker_restriction() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds).with_makers(["KIA".to_string()]);
        let rows = sel.apply(&ds);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.maker == "KIA"));
    }

    #[test]
    fn test_maker_outside_selected_category_yields_nothing() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds)
            .with_categories([Category::TwoWheeler])
            .with_makers(["KIA".to_string()]);
        assert!(sel.apply(&ds).is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds)
            .with_range(Some(ymd(2023, 6)), Some(ymd(2024, 1)));
        let rows = sel.apply(&ds);
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.date >= ymd(2023, 6)));
    }

    #[test]
    fn test_empty_category_override_keeps_defaults() {
        let ds = dataset();
        let sel = FilterSelection::defaults_for(&ds).with_categories(Vec::new());
        assert_eq!(sel.categories.len(), 3);
    }

    #[test]
    fn test_toggles() {
        let ds = dataset();
        let mut sel = FilterSelection::defaults_for(&ds);
        sel.toggle_category(Category::ThreeWheeler);
        assert!(!sel.categories.contains(&Category::ThreeWheeler));
        sel.toggle_category(Category::ThreeWheeler);
        assert!(sel.categories.contains(&Category::ThreeWheeler));

        sel.toggle_maker("KIA");
        assert!(sel.makers.contains("KIA"));
        sel.toggle_maker("KIA");
        assert!(sel.makers.is_empty());

        sel.toggle_maker("ABZO");
        sel.clear_makers();
        assert!(sel.makers.is_empty());
    }

    #[test]
    fn test_shift_bounds_are_clamped() {
        let ds = dataset();
        let span = ds.date_span().unwrap();
        let mut sel = FilterSelection::defaults_for(&ds);

        sel.shift_start(-3, span);
        assert_eq!(sel.start, ymd(2023, 1));
        sel.shift_start(5, span);
        assert_eq!(sel.start, ymd(2023, 6));
        sel.shift_end(2, span);
        assert_eq!(sel.end, ymd(2024, 1));
        sel.shift_end(-12, span);
        assert_eq!(sel.end, ymd(2023, 6), "end may not pass start");
        sel.shift_start(6, span);
        assert_eq!(sel.start, ymd(2023, 6), "start may not pass end");
    }

    #[test]
    fn test_rebase_follows_a_wider_dataset() {
        let kia_only = Dataset::from_records(vec![RegistrationRecord {
            maker: "KIA".to_string(),
            month: Month::Jan,
            registrations: Some(40),
            year: 2023,
            category: Some(Category::FourWheeler),
        }]);
        let scope = SelectionScope::of(&kia_only);
        let sel = FilterSelection::defaults_for(&kia_only);

        let wider = dataset();
        let rebased = sel.rebase(&scope, &wider);
        assert_eq!(rebased.categories.len(), 3, "new categories switched on");
        assert_eq!((rebased.start, rebased.end), (ymd(2023, 1), ymd(2024, 1)));
        assert_eq!(rebased.apply(&wider).len(), wider.len());
    }

    #[test]
    fn test_rebase_keeps_user_choices() {
        let ds = dataset();
        let scope = SelectionScope::of(&ds);
        let mut sel = FilterSelection::defaults_for(&ds)
            .with_makers(["KIA".to_string(), "GONE".to_string()]);
        sel.toggle_category(Category::TwoWheeler);
        sel.shift_end(-7, scope.span.unwrap());
        assert_eq!(sel.end, ymd(2023, 6));

        let rebased = sel.rebase(&scope, &ds);
        assert!(!rebased.categories.contains(&Category::TwoWheeler));
        assert_eq!(rebased.makers, BTreeSet::from(["KIA".to_string()]));
        assert_eq!((rebased.start, rebased.end), (ymd(2023, 1), ymd(2023, 6)));
    }
}
