//! Error types for storage operations

use crate::package::PackageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
