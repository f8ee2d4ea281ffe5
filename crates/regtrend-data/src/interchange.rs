//! The flat CSV shared by ingestion and the dashboard.
//!
//! Header: `Maker,Month,Registrations,Year,Category`. Missing counts and
//! unclassified makers are written as empty fields.

use std::fs::File;
use std::path::Path;

use regtrend_core::error::{RegtrendError, Result};
use regtrend_core::models::RegistrationRecord;

/// Overwrite `path` with `records`.
///
/// Writes to a sibling temp file first and renames it into place, so an
/// interrupted run never leaves a truncated table behind.
pub fn write_records(path: &Path, records: &[RegistrationRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    std::fs::rename(&tmp, path)?;

    tracing::debug!(rows = records.len(), "wrote {}", path.display());
    Ok(())
}

/// Read every row of the interchange file at `path`.
pub fn read_records(path: &Path) -> Result<Vec<RegistrationRecord>> {
    let file = File::open(path).map_err(|source| RegtrendError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let records = reader
        .deserialize::<RegistrationRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    tracing::debug!(rows = records.len(), "read {}", path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtrend_core::models::{Category, Month};
    use tempfile::TempDir;

    fn sample() -> Vec<RegistrationRecord> {
        vec![
            RegistrationRecord {
                maker: "AAHANA  COMMERCE PVT LTD".to_string(),
                month: Month::Jan,
                registrations: Some(10),
                year: 2023,
                category: Some(Category::ThreeWheeler),
            },
            RegistrationRecord {
                maker: "ACME, INC".to_string(),
                month: Month::Feb,
                registrations: None,
                year: 2023,
                category: None,
            },
        ]
    }

    #[test]
    fn test_write_layout() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("processed").join("vehicle_data.csv");
        write_records(&path, &sample()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Maker,Month,Registrations,Year,Category");
        assert_eq!(lines[1], "AAHANA  COMMERCE PVT LTD,JAN,10,2023,3W");
        assert_eq!(lines[2], "\"ACME, INC\",FEB,,2023,");
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_read_back_preserves_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vehicle_data.csv");
        write_records(&path, &sample()).unwrap();
        assert_eq!(read_records(&path).unwrap(), sample());
    }

    #[test]
    fn test_write_is_byte_identical_across_runs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vehicle_data.csv");
        write_records(&path, &sample()).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_records(&path, &sample()).unwrap();
        assert_eq!(first, std::fs::read(&path).unwrap());
    }

    #[test]
    fn test_read_accepts_float_counts() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vehicle_data.csv");
        std::fs::write(
            &path,
            "Maker,Month,Registrations,Year,Category\nKIA,MAR,120.0,2024,4W\n",
        )
        .unwrap();
        let records = read_records(&path).unwrap();
        assert_eq!(records[0].registrations, Some(120));
        assert_eq!(records[0].month, Month::Mar);
    }

    #[test]
    fn test_read_rejects_bad_month() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vehicle_data.csv");
        std::fs::write(
            &path,
            "Maker,Month,Registrations,Year,Category\nKIA,MARCH,1,2024,4W\n",
        )
        .unwrap();
        assert!(matches!(read_records(&path), Err(RegtrendError::Csv(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_records(Path::new("/nonexistent/vehicle_data.csv")).unwrap_err();
        assert!(matches!(err, RegtrendError::FileRead { .. }));
    }
}
