//! Error types for the catalog crate.

use thiserror::Error;

/// Errors that can occur while loading or validating the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error occurred while reading a catalog file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a JSONL file couldn't be parsed
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Referenced entity doesn't exist (e.g., embedding for an unknown item)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u64 },

    /// Embedding vectors in the catalog must all share one dimension
    #[error("Dimension mismatch: expected {expected} but item {item_id} has {found}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        item_id: u64,
    },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
