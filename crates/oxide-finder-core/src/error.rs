//! Error types for raw SQL finders.

use thiserror::Error;

/// Contract violations reported while building a raw SQL fragment.
///
/// Malformed SQL is never an error: the scanner is lenient and returns
/// whatever text it collected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinderError {
    /// A table alias was asked for a name that is neither a declared
    /// property nor a computed attribute of its model.
    #[error("unknown column '{name}' on table '{table}'")]
    UnknownColumn {
        /// Storage name of the table.
        table: String,
        /// The requested name.
        name: String,
    },
}

/// Result type alias for finder operations.
pub type Result<T> = std::result::Result<T, FinderError>;
