use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by regtrend.
#[derive(Error, Debug)]
pub enum RegtrendError {
    /// The raw-input directory holds no spreadsheet files.
    #[error("No spreadsheet files found in {0}; expected one .xlsx per year (e.g. makers_monthwise_2023.xlsx)")]
    NoInputFiles(PathBuf),

    /// A spreadsheet filename carries no 4-digit year.
    #[error("No 4-digit year found in filename: {0}")]
    MissingYear(String),

    /// A spreadsheet could not be opened or has no readable worksheet.
    #[error("Failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A category label is not one of `2W`, `3W`, `4W`.
    #[error("Invalid vehicle category: {0}")]
    InvalidCategory(String),

    /// A month label is not one of the twelve three-letter codes.
    #[error("Invalid month code: {0}")]
    InvalidMonth(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the regtrend crates.
pub type Result<T> = std::result::Result<T, RegtrendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_no_input_files() {
        let err = RegtrendError::NoInputFiles(PathBuf::from("data/raw"));
        let msg = err.to_string();
        assert!(msg.starts_with("No spreadsheet files found in data/raw"));
    }

    #[test]
    fn test_error_display_missing_year() {
        let err = RegtrendError::MissingYear("makers_monthwise.xlsx".to_string());
        assert_eq!(
            err.to_string(),
            "No 4-digit year found in filename: makers_monthwise.xlsx"
        );
    }

    #[test]
    fn test_error_display_workbook() {
        let err = RegtrendError::Workbook {
            path: PathBuf::from("/raw/2023.xlsx"),
            message: "no worksheet".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read workbook /raw/2023.xlsx: no worksheet"
        );
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = RegtrendError::FileRead {
            path: PathBuf::from("/data/processed/vehicle_data.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("vehicle_data.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_invalid_category() {
        let err = RegtrendError::InvalidCategory("5W".to_string());
        assert_eq!(err.to_string(), "Invalid vehicle category: 5W");
    }

    #[test]
    fn test_error_display_invalid_month() {
        let err = RegtrendError::InvalidMonth("JANUARY".to_string());
        assert_eq!(err.to_string(), "Invalid month code: JANUARY");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: RegtrendError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_display_config() {
        let err = RegtrendError::Config("category table has no rows".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: category table has no rows"
        );
    }
}
