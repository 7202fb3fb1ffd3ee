//! Error types for the ingestion crate.

use thiserror::Error;

/// Errors that can occur while collecting items from a platform
#[derive(Error, Debug)]
pub enum IngestError {
    /// Network failure or non-2xx HTTP status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform API returned something we can't work with
    #[error("API error: {0}")]
    Api(String),

    /// Response body didn't match the expected shape
    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// I/O error while writing a downloaded image or metadata
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, IngestError>;
