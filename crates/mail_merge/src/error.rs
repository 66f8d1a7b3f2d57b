//! Error types for data source loading and placeholder mapping

use thiserror::Error;

/// Errors that can occur while loading data or building mappings
#[derive(Debug, Error)]
pub enum MailMergeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("XLSX parse error: {0}")]
    XlsxParse(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Record index past the end of the data
    #[error("Record not found at index {index} ({count} records)")]
    RecordNotFound { index: usize, count: usize },

    /// The selected record is the row holding the placeholder keys
    #[error("Record {0} is the placeholder row")]
    PlaceholderRowSelected(usize),

    #[error("Data source is empty: {0}")]
    EmptyDataSource(String),

    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid token mapping: {0}")]
    Mapping(#[from] fill_engine::FillError),
}

/// Result type for data source operations
pub type Result<T> = std::result::Result<T, MailMergeError>;
