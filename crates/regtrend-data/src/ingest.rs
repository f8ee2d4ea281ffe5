//! Wide-to-long normalization of the yearly maker x month spreadsheets.
//!
//! Each raw export carries one row per manufacturer and one column per
//! month. [`reshape`] melts that into one [`RegistrationRecord`] per
//! (maker, month) and [`process`] stitches every year in a directory into the
//! interchange CSV.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use regtrend_core::categories::CategoryLookup;
use regtrend_core::error::{RegtrendError, Result};
use regtrend_core::models::{Month, RegistrationRecord};
use tracing::{debug, info, warn};

use crate::interchange::write_records;
use crate::workbook::{read_sheet, Cell, RawSheet};

/// Zero-based column of the manufacturer name.
const MAKER_COL: usize = 1;
/// Zero-based column of the first month.
const FIRST_MONTH_COL: usize = 2;
/// Month labels sit on the second row unless a later row carries them.
const DEFAULT_MONTH_ROW: usize = 1;
/// How many leading rows are searched for the month labels.
const MONTH_ROW_SCAN: usize = 5;

// ── Summary ───────────────────────────────────────────────────────────────────

/// What a processing run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestSummary {
    /// Number of spreadsheets read.
    pub files: usize,
    /// Years found in the file names, in file order.
    pub years: Vec<i32>,
    /// Rows written to the interchange file.
    pub rows: usize,
    /// Rows whose maker has no category.
    pub unclassified_rows: usize,
    /// Distinct unclassified maker names, sorted.
    pub unclassified_makers: Vec<String>,
}

impl IngestSummary {
    fn from_records(files: usize, years: Vec<i32>, records: &[RegistrationRecord]) -> Self {
        let unclassified: Vec<&RegistrationRecord> =
            records.iter().filter(|r| r.category.is_none()).collect();
        let makers: BTreeSet<String> = unclassified.iter().map(|r| r.maker.clone()).collect();
        Self {
            files,
            years,
            rows: records.len(),
            unclassified_rows: unclassified.len(),
            unclassified_makers: makers.into_iter().collect(),
        }
    }
}

// ── File discovery ────────────────────────────────────────────────────────────

/// All `.xlsx` files directly inside `dir`, sorted by path.
///
/// Office lock files (`~$name.xlsx`) are skipped.
pub fn find_workbooks(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Raw input directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let is_xlsx = entry
                .path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
                .unwrap_or(false);
            let is_lock = entry.file_name().to_string_lossy().starts_with("~$");
            entry.file_type().is_file() && is_xlsx && !is_lock
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]{4}").expect("static pattern"))
}

/// First run of four digits in `file_name`.
pub fn extract_year(file_name: &str) -> Result<i32> {
    year_pattern()
        .find(file_name)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| RegtrendError::MissingYear(file_name.to_string()))
}

// ── Reshape ───────────────────────────────────────────────────────────────────

/// Row index holding the month labels.
fn locate_month_row(sheet: &RawSheet) -> usize {
    (1..MONTH_ROW_SCAN.min(sheet.height()))
        .find(|&r| {
            sheet
                .row(r)
                .iter()
                .skip(FIRST_MONTH_COL)
                .filter_map(Cell::as_text)
                .any(|label| label.parse::<Month>().is_ok())
        })
        .unwrap_or(DEFAULT_MONTH_ROW)
}

/// Month columns as `(column, month)`, in sheet order.
///
/// The last column is the yearly total and is never a month. Columns with a
/// blank header are dropped silently; unknown labels are dropped with a
/// warning.
fn month_columns(sheet: &RawSheet, month_row: usize) -> Vec<(usize, Month)> {
    let total_col = sheet.width().saturating_sub(1);
    (FIRST_MONTH_COL..total_col)
        .filter_map(|col| {
            let label = sheet.cell(month_row, col).as_text()?;
            match label.parse::<Month>() {
                Ok(month) => Some((col, month)),
                Err(_) => {
                    warn!(column = col, label = %label, "skipping column with unrecognised month label");
                    None
                }
            }
        })
        .collect()
}

/// Maker name exactly as written in the sheet, `None` for blank cells.
fn maker_name(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) if !s.trim().is_empty() => Some(s.clone()),
        Cell::Text(_) | Cell::Empty => None,
        other => other.as_text(),
    }
}

/// Melt one wide sheet into long records.
///
/// Output order follows the melt: all makers for the first month, then all
/// makers for the next, and so on.
pub fn reshape(sheet: &RawSheet, year: i32, lookup: &CategoryLookup) -> Vec<RegistrationRecord> {
    let month_row = locate_month_row(sheet);
    let months = month_columns(sheet, month_row);

    let makers: Vec<(usize, String)> = (month_row + 1..sheet.height())
        .filter_map(|r| maker_name(sheet.cell(r, MAKER_COL)).map(|m| (r, m)))
        .collect();

    debug!(
        year,
        month_row,
        months = months.len(),
        makers = makers.len(),
        "reshaping sheet"
    );

    let mut records = Vec::with_capacity(months.len() * makers.len());
    for &(col, month) in &months {
        for (row, maker) in &makers {
            records.push(RegistrationRecord {
                maker: maker.clone(),
                month,
                registrations: sheet.cell(*row, col).to_count(),
                year,
                category: lookup.category_of(maker),
            });
        }
    }
    records
}

// ── Directory pipeline ────────────────────────────────────────────────────────

/// Read and reshape every workbook in `raw_dir`, concatenated in path order.
///
/// All file names are checked for a year before any workbook is opened.
pub fn normalize_dir(
    raw_dir: &Path,
    lookup: &CategoryLookup,
) -> Result<(Vec<i32>, Vec<RegistrationRecord>)> {
    let files = find_workbooks(raw_dir);
    if files.is_empty() {
        return Err(RegtrendError::NoInputFiles(raw_dir.to_path_buf()));
    }

    let dated: Vec<(PathBuf, i32)> = files
        .into_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            extract_year(&name).map(|year| (path, year))
        })
        .collect::<Result<_>>()?;

    let mut records = Vec::new();
    for (path, year) in &dated {
        let sheet = read_sheet(path)?;
        let rows = reshape(&sheet, *year, lookup);
        info!(year, rows = rows.len(), "normalized {}", path.display());
        records.extend(rows);
    }

    Ok((dated.into_iter().map(|(_, y)| y).collect(), records))
}

/// Normalize `raw_dir` and overwrite `output` with the result.
pub fn process(raw_dir: &Path, output: &Path, lookup: &CategoryLookup) -> Result<IngestSummary> {
    let (years, records) = normalize_dir(raw_dir, lookup)?;
    write_records(output, &records)?;

    let summary = IngestSummary::from_records(years.len(), years, &records);
    if !summary.unclassified_makers.is_empty() {
        warn!(
            makers = summary.unclassified_makers.len(),
            rows = summary.unclassified_rows,
            "unclassified makers will be excluded from the dashboard"
        );
    }
    info!(
        files = summary.files,
        rows = summary.rows,
        "wrote {}",
        output.display()
    );
    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
