//! Error types for document model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Unbalanced element: expected {expected}, found {found}")]
    UnbalancedElement { expected: String, found: String },

    #[error("Text outside of a paragraph")]
    TextOutsideParagraph,

    #[error("Tree structure error: {0}")]
    TreeStructureError(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
