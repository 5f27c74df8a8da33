//! Error types for the query model.

use oxide_finder_core::FinderError;
use thiserror::Error;

/// Errors raised while building a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrmError {
    /// The raw SQL callback failed.
    #[error(transparent)]
    Finder(#[from] FinderError),

    /// Invalid field name.
    #[error("invalid field: {0}")]
    InvalidField(String),
}

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, OrmError>;
