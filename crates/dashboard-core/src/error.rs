use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed or serialized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from a CSV header row.
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A price cell had no numeric content after stripping the currency symbol.
    #[error("Invalid price value: {0:?}")]
    InvalidPrice(String),

    /// A quantity cell was not a non-negative integer.
    #[error("Invalid quantity value: {0:?}")]
    InvalidQuantity(String),

    /// A date string did not match any recognised format.
    #[error("Invalid date format: {0}")]
    DateParse(String),

    /// No input CSV files were found under the given directory.
    #[error("No CSV files found in {0}")]
    NoInputFiles(PathBuf),
}

impl DashboardError {
    /// Attach a line number and file to a row-level error.
    ///
    /// Row errors bubble up from cell parsers that do not know where they
    /// are; the merger wraps them once it does.
    pub fn at_row(self, path: &std::path::Path, line: usize) -> Self {
        match self {
            DashboardError::InvalidPrice(v) => {
                DashboardError::InvalidPrice(format!("{v} ({}:{line})", path.display()))
            }
            DashboardError::InvalidQuantity(v) => {
                DashboardError::InvalidQuantity(format!("{v} ({}:{line})", path.display()))
            }
            DashboardError::DateParse(v) => {
                DashboardError::DateParse(format!("{v} ({}:{line})", path.display()))
            }
            other => other,
        }
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/data/daily_sales_data_0.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("daily_sales_data_0.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = DashboardError::MissingColumn {
            path: PathBuf::from("in.csv"),
            column: "price".to_string(),
        };
        assert_eq!(err.to_string(), "Missing column 'price' in in.csv");
    }

    #[test]
    fn test_error_display_invalid_price() {
        let err = DashboardError::InvalidPrice("$abc".to_string());
        assert_eq!(err.to_string(), "Invalid price value: \"$abc\"");
    }

    #[test]
    fn test_error_display_date_parse() {
        let err = DashboardError::DateParse("15/01/21".to_string());
        assert_eq!(err.to_string(), "Invalid date format: 15/01/21");
    }

    #[test]
    fn test_error_display_no_input_files() {
        let err = DashboardError::NoInputFiles(PathBuf::from("/empty/dir"));
        assert_eq!(err.to_string(), "No CSV files found in /empty/dir");
    }

    #[test]
    fn test_at_row_annotates_cell_errors() {
        let err = DashboardError::InvalidPrice("$".to_string()).at_row(Path::new("a.csv"), 7);
        let msg = err.to_string();
        assert!(msg.contains("a.csv:7"), "got: {msg}");
    }

    #[test]
    fn test_at_row_leaves_other_errors_alone() {
        let err = DashboardError::NoInputFiles(PathBuf::from("data")).at_row(Path::new("a.csv"), 7);
        assert_eq!(err.to_string(), "No CSV files found in data");
    }

    #[test]
    fn test_error_from_csv() {
        let mut reader = csv::ReaderBuilder::new().from_reader("a,b\n1\n".as_bytes());
        let err: DashboardError = reader.records().next().unwrap().unwrap_err().into();
        assert!(matches!(err, DashboardError::Csv(_)));
        assert!(err.to_string().starts_with("CSV error:"));
    }
}
