//! Error types for batch runs
//!
//! Only conditions that stop a batch before any job starts are errors.
//! A document that fails is reported through its [`JobOutcome`](crate::JobOutcome).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data source error: {0}")]
    DataSource(#[from] mail_merge::MailMergeError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] fill_engine::FillError),

    #[error("Package error: {0}")]
    Package(#[from] store::PackageError),

    #[error("Template directory not found: {0}")]
    TemplateDirNotFound(PathBuf),

    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}

pub type Result<T> = std::result::Result<T, BatchError>;
