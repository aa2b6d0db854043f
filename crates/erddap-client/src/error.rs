//! Error types for ERDDAP access.

use thiserror::Error;

/// Errors that can occur talking to an ERDDAP server.
#[derive(Error, Debug)]
pub enum ErddapError {
    /// Transport-level failure (DNS, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body was not a well-formed griddap table.
    #[error("failed to parse response from {url}: {reason}")]
    Parse { url: String, reason: String },

    /// The table is missing an expected column.
    #[error("response is missing column '{column}'")]
    MissingColumn { column: String },

    /// The table row count does not match the requested window.
    #[error("expected {expected} rows for the requested window, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Result type for ERDDAP operations.
pub type Result<T> = std::result::Result<T, ErddapError>;
