//! Geospatial threshold-and-classification pipeline.
//!
//! Turns two irregularly-oriented gridded scalar fields (sea-surface
//! temperature and a food proxy such as chlorophyll-a) into an aligned,
//! classified set of candidate fishing hot spots:
//!
//! ```text
//! remote dataset
//!      │
//!      ▼
//! latest_subset(bbox)          orientation-aware windowing, newest slice
//!      │
//!      ▼
//! align_to(chl → sst grid)     nearest-neighbor by default
//!      │
//!      ▼
//! classify(species profile)    per-cell threshold mask
//!      │
//!      ▼
//! sample_spots(cap)            bounded, evenly-spaced markers
//! ```
//!
//! Every stage is a pure function over freshly-allocated value types;
//! separate requests need no coordination. Rendering of the subsetted
//! fields lives in the `renderer` crate.

pub mod align;
pub mod classify;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod orientation;
pub mod sample;
pub mod subset;

pub use align::{align_to, ResampleMethod};
pub use classify::classify;
pub use dataset::GriddedDataset;
pub use error::{PipelineError, Result};
pub use grid::{MaskGrid, ScalarGrid};
pub use orientation::{axis_window, oriented_bounds, AxisOrientation, AxisWindow};
pub use sample::{sample_spots, sample_spots_random, DEFAULT_SPOT_CAP};
pub use subset::latest_subset;
