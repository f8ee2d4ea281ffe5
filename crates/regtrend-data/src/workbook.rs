//! Spreadsheet access.
//!
//! Opens a workbook with [`calamine`] and flattens its first worksheet into
//! a [`RawSheet`] grid with absolute (zero-based) row and column positions,
//! so layout rules can be expressed against fixed coordinates.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use regtrend_core::error::{RegtrendError, Result};

/// One spreadsheet cell, reduced to what the normalizer needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// `true` for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Cell content as trimmed text, `None` when blank.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let t = s.trim();
                (!t.is_empty()).then(|| t.to_string())
            }
            Cell::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Coerce to a registration count. Anything non-numeric is `None`.
    pub fn to_count(&self) -> Option<i64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => n.is_finite().then(|| n.round() as i64),
            Cell::Text(s) => {
                let t = s.trim();
                t.parse::<i64>().ok().or_else(|| {
                    t.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.round() as i64)
                })
            }
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            _ => Cell::Empty,
        }
    }
}

/// A worksheet as a ragged grid of cells.
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Cell at `(row, col)`; out-of-range positions read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Read the first worksheet of the workbook at `path`.
pub fn read_sheet(path: &Path) -> Result<RawSheet> {
    let workbook_err = |message: String| RegtrendError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| workbook_err("workbook has no worksheet".to_string()))?
        .map_err(|e| workbook_err(e.to_string()))?;

    // calamine ranges start at the first used cell; pad back to A1.
    let (row0, col0) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row0 as usize];
    for data_row in range.rows() {
        let mut cells = vec![Cell::Empty; col0 as usize];
        cells.extend(data_row.iter().map(Cell::from));
        rows.push(cells);
    }

    tracing::debug!(
        rows = rows.len(),
        "read worksheet from {}",
        path.display()
    );

    Ok(RawSheet::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_count_numbers() {
        assert_eq!(Cell::Number(42.0).to_count(), Some(42));
        assert_eq!(Cell::Number(41.6).to_count(), Some(42));
        assert_eq!(Cell::Number(f64::NAN).to_count(), None);
    }

    #[test]
    fn test_cell_to_count_text() {
        assert_eq!(Cell::Text(" 1200 ".to_string()).to_count(), Some(1200));
        assert_eq!(Cell::Text("12.0".to_string()).to_count(), Some(12));
        assert_eq!(Cell::Text("-".to_string()).to_count(), None);
        assert_eq!(Cell::Text("1,234".to_string()).to_count(), None);
        assert_eq!(Cell::Empty.to_count(), None);
    }

    #[test]
    fn test_cell_as_text() {
        assert_eq!(Cell::Text("  JAN ".to_string()).as_text().as_deref(), Some("JAN"));
        assert_eq!(Cell::Text("   ".to_string()).as_text(), None);
        assert_eq!(Cell::Number(2023.0).as_text().as_deref(), Some("2023"));
        assert_eq!(Cell::Empty.as_text(), None);
    }

    #[test]
    fn test_cell_from_calamine_data() {
        assert_eq!(Cell::from(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(Cell::from(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(
            Cell::from(&Data::String("KIA".to_string())),
            Cell::Text("KIA".to_string())
        );
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn test_raw_sheet_out_of_range_is_empty() {
        let sheet = RawSheet::new(vec![vec![Cell::Number(1.0)]]);
        assert_eq!(sheet.cell(0, 0), &Cell::Number(1.0));
        assert_eq!(sheet.cell(0, 5), &Cell::Empty);
        assert_eq!(sheet.cell(9, 0), &Cell::Empty);
        assert!(sheet.row(3).is_empty());
    }

    #[test]
    fn test_raw_sheet_dimensions() {
        let sheet = RawSheet::new(vec![
            vec![Cell::Empty],
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
        ]);
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.width(), 3);
    }

    #[test]
    fn test_read_sheet_rejects_non_workbook() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bogus_2023.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();
        let err = read_sheet(&path).unwrap_err();
        assert!(matches!(err, RegtrendError::Workbook { .. }));
    }

    #[test]
    fn test_read_sheet_pads_back_to_a1() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("offset_2024.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 2, "JAN").unwrap();
        sheet.write_number(3, 3, 15).unwrap();
        workbook.save(&path).unwrap();

        let raw = read_sheet(&path).unwrap();
        assert_eq!(raw.height(), 4);
        assert_eq!(raw.width(), 4);
        assert_eq!(raw.cell(2, 2), &Cell::Text("JAN".to_string()));
        assert_eq!(raw.cell(3, 3).to_count(), Some(15));
        assert!(raw.cell(0, 0).is_blank());
        assert!(raw.cell(3, 2).is_blank());
    }
}
