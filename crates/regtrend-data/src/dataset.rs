//! The dashboard's in-memory table.
//!
//! Built from the interchange file: unclassified makers are dropped, each row
//! gets a calendar date and quarter, and rows are ordered by date.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use regtrend_core::error::Result;
use regtrend_core::models::{Category, Month, Quarter, RegistrationRecord};
use tracing::info;

use crate::interchange::read_records;

/// A classified registration row with derived calendar fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRow {
    pub maker: String,
    pub category: Category,
    pub year: i32,
    pub month: Month,
    /// First day of `month` in `year`.
    pub date: NaiveDate,
    pub quarter: Quarter,
    /// Missing counts contribute nothing to sums.
    pub registrations: Option<i64>,
}

impl DashboardRow {
    /// Count used in aggregation.
    pub fn count(&self) -> i64 {
        self.registrations.unwrap_or(0)
    }

    fn from_record(record: RegistrationRecord) -> Option<Self> {
        let category = record.category?;
        let date = record.date()?;
        Some(Self {
            quarter: Quarter::from_date(date),
            maker: record.maker,
            category,
            year: record.year,
            month: record.month,
            date,
            registrations: record.registrations,
        })
    }
}

/// All classified rows, ascending by date.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<DashboardRow>,
    /// Interchange rows excluded for lacking a category.
    pub dropped_rows: usize,
}

impl Dataset {
    /// Load and prepare the interchange file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let dataset = Self::from_records(read_records(path)?);
        info!(
            rows = dataset.len(),
            dropped = dataset.dropped_rows,
            "loaded dataset from {}",
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_records(records: Vec<RegistrationRecord>) -> Self {
        let total = records.len();
        let mut rows: Vec<DashboardRow> = records
            .into_iter()
            .filter_map(DashboardRow::from_record)
            .collect();
        // Stable: rows sharing a date keep file order.
        rows.sort_by_key(|r| r.date);
        Self {
            dropped_rows: total - rows.len(),
            rows,
        }
    }

    pub fn rows(&self) -> &[DashboardRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct categories present, sorted.
    pub fn categories(&self) -> Vec<Category> {
        self.rows
            .iter()
            .map(|r| r.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct maker names present, sorted.
    pub fn makers(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.maker.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Earliest and latest month, `None` when empty.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.rows.first()?.date, self.rows.last()?.date))
    }
}
