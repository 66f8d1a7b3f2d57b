//! Error types for fill engine operations

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FillError {
    /// An empty token would match between every pair of characters
    #[error("Token must not be empty")]
    EmptyToken,
}

pub type Result<T> = std::result::Result<T, FillError>;
