//! Error types for the grid pipeline.

use thiserror::Error;

/// Errors that can occur in the subsetting/alignment/classification pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The requested interval does not intersect the grid extent.
    ///
    /// Raised by orientation-aware windowing so a non-overlapping request
    /// never degrades into a silently empty overlay.
    #[error("requested region {requested} does not intersect grid extent {extent}")]
    EmptyRegion { requested: String, extent: String },

    /// The source dataset has no time samples.
    #[error("dataset '{dataset}' has no time samples")]
    NoTimeData { dataset: String },

    /// Aligner invoked with grids whose coordinate extents do not overlap.
    ///
    /// Distinguishable from a successful all-missing alignment: callers can
    /// tell "valid but empty" from "malformed".
    #[error("cannot align grids with disjoint extents: source {src}, target {target}")]
    DisjointGrids { src: String, target: String },

    /// Classifier invoked with grids that are not co-indexed.
    #[error("grids are not co-indexed: {left} vs {right}")]
    GridMismatch { left: String, right: String },

    /// A grid failed construction-time validation.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Upstream read failure propagated through the dataset boundary.
    #[error("dataset read failed: {0}")]
    Source(String),
}

impl PipelineError {
    /// Create a Source error from any upstream failure.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
