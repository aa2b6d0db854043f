//! ERDDAP griddap client.
//!
//! Opens a handle on one gridded variable of an ERDDAP dataset, discovers
//! its coordinate axes up front, and serves orientation-safe windowed reads
//! as `grid_pipeline::ScalarGrid` slices. Reads use index subscripts
//! computed from the resolved axis windows, so a descending latitude axis
//! can never silently produce an empty response.
//!
//! Fetched subsets go through `GridCache`, a TTL cache keyed by dataset URL
//! and bounding box.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod response;

pub use cache::{CacheStats, GridCache};
pub use dataset::ErddapDataset;
pub use error::{ErddapError, Result};
