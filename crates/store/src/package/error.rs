//! Error types for office package operations

use thiserror::Error;

/// Errors that can occur while reading or writing DOCX/XLSX packages
#[derive(Debug, Error)]
pub enum PackageError {
    /// IO error (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Invalid package structure
    #[error("Invalid package structure: {0}")]
    InvalidStructure(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Relationship error
    #[error("Relationship error: {0}")]
    RelationshipError(String),

    /// Image processing error
    #[error("Image error: {0}")]
    ImageError(String),

    /// Document model error
    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    /// UTF-8 encoding error
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<quick_xml::Error> for PackageError {
    fn from(err: quick_xml::Error) -> Self {
        PackageError::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for PackageError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        PackageError::XmlParse(format!("Attribute error: {}", err))
    }
}

/// Result type for package operations
pub type PackageResult<T> = std::result::Result<T, PackageError>;
