//! Error types for PDF field extraction

use thiserror::Error;

/// Errors raised while validating or reading a PDF
#[derive(Debug, Error)]
pub enum ExtractError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File does not carry a .pdf extension
    #[error("Not a PDF file name: {0}")]
    NotPdfExtension(String),

    /// File does not start with a PDF header
    #[error("Missing %PDF header: {0}")]
    NotPdfContent(String),

    /// File exceeds the size limit
    #[error("PDF is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    /// Text extraction failed
    #[error("Failed to extract PDF text: {0}")]
    Parse(String),

    /// Invalid field list
    #[error("Invalid field list: {0}")]
    Fields(#[from] serde_json::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
