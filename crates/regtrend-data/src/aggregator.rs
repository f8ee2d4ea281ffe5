//! Grouped sums and growth series over filtered dashboard rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regtrend_core::growth::{pct_change, pivot_growth};
use regtrend_core::models::Category;

use crate::dataset::DashboardRow;

// ── Result types ──────────────────────────────────────────────────────────────

/// Registrations for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub registrations: i64,
}

/// Monthly series for a single category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    pub category: Category,
    pub points: Vec<SeriesPoint>,
}

/// A period total with its change over the previous period.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthRow {
    /// `"2023"` or `"2023Q1"`.
    pub period: String,
    pub registrations: i64,
    /// `None` for the first period or a zero predecessor.
    pub growth: Option<f64>,
}

/// One line of a year pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub key: String,
    /// One value per [`YearPivot::years`] entry, zero-filled.
    pub values: Vec<i64>,
    /// Last year against the one before; `None` with fewer than two years.
    pub growth: Option<f64>,
}

/// Registrations by (key, year) with years as columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearPivot {
    pub years: Vec<i32>,
    pub rows: Vec<PivotRow>,
}

// ── RegistrationAggregator ────────────────────────────────────────────────────

/// Stateless helper that groups filtered rows for the dashboard widgets.
pub struct RegistrationAggregator;

impl RegistrationAggregator {
    /// Total registrations per month, ascending.
    pub fn total_by_date(rows: &[&DashboardRow]) -> Vec<SeriesPoint> {
        let mut map: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for row in rows {
            *map.entry(row.date).or_default() += row.count();
        }
        map.into_iter()
            .map(|(date, registrations)| SeriesPoint {
                date,
                registrations,
            })
            .collect()
    }

    /// One monthly series per category present in `rows`.
    pub fn by_date_category(rows: &[&DashboardRow]) -> Vec<CategorySeries> {
        let mut map: BTreeMap<Category, BTreeMap<NaiveDate, i64>> = BTreeMap::new();
        for row in rows {
            *map.entry(row.category)
                .or_default()
                .entry(row.date)
                .or_default() += row.count();
        }
        map.into_iter()
            .map(|(category, series)| CategorySeries {
                category,
                points: series
                    .into_iter()
                    .map(|(date, registrations)| SeriesPoint {
                        date,
                        registrations,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Yearly totals with year-over-year growth.
    pub fn yearly_totals(rows: &[&DashboardRow]) -> Vec<GrowthRow> {
        let mut map: BTreeMap<i32, i64> = BTreeMap::new();
        for row in rows {
            *map.entry(row.year).or_default() += row.count();
        }
        Self::with_growth(map.into_iter().map(|(y, n)| (y.to_string(), n)).collect())
    }

    /// Calendar-quarter totals with quarter-over-quarter growth.
    pub fn quarterly_totals(rows: &[&DashboardRow]) -> Vec<GrowthRow> {
        let mut map = BTreeMap::new();
        for row in rows {
            *map.entry(row.quarter).or_insert(0i64) += row.count();
        }
        Self::with_growth(map.into_iter().map(|(q, n)| (q.to_string(), n)).collect())
    }

    /// Registrations per (category, year).
    pub fn category_year_pivot(rows: &[&DashboardRow]) -> YearPivot {
        Self::pivot_by(rows, |r| r.category.to_string())
    }

    /// Registrations per (maker, year).
    pub fn maker_year_pivot(rows: &[&DashboardRow]) -> YearPivot {
        Self::pivot_by(rows, |r| r.maker.clone())
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn with_growth(periods: Vec<(String, i64)>) -> Vec<GrowthRow> {
        let values: Vec<f64> = periods.iter().map(|(_, n)| *n as f64).collect();
        periods
            .into_iter()
            .zip(pct_change(&values))
            .map(|((period, registrations), growth)| GrowthRow {
                period,
                registrations,
                growth,
            })
            .collect()
    }

    /// Generic pivot driver; `key_fn` picks the row label.
    fn pivot_by(rows: &[&DashboardRow], key_fn: impl Fn(&DashboardRow) -> String) -> YearPivot {
        let mut cells: BTreeMap<String, BTreeMap<i32, i64>> = BTreeMap::new();
        let mut years: BTreeMap<i32, ()> = BTreeMap::new();
        for row in rows {
            years.insert(row.year, ());
            *cells
                .entry(key_fn(row))
                .or_default()
                .entry(row.year)
                .or_default() += row.count();
        }
        let years: Vec<i32> = years.into_keys().collect();

        let rows = cells
            .into_iter()
            .map(|(key, by_year)| {
                let values: Vec<i64> = years
                    .iter()
                    .map(|y| by_year.get(y).copied().unwrap_or(0))
                    .collect();
                let growth = match values.as_slice() {
                    [.., prev, curr] => Some(pivot_growth(*prev as f64, *curr as f64)),
                    _ => None,
                };
                PivotRow {
                    key,
                    values,
                    growth,
                }
            })
            .collect();

        YearPivot { years, rows }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
