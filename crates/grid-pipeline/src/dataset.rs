//! Abstraction over an upstream gridded data source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::grid::ScalarGrid;
use crate::orientation::AxisWindow;

/// A remote or in-memory dataset exposing one scalar variable over
/// (time, latitude, longitude) axes.
///
/// Axis values are discovered once when the handle is opened and are
/// immutable for its lifetime. `read_window` takes *index* windows in the
/// axes' own storage order; implementations must collapse any singleton
/// dimensions (e.g. a degenerate depth axis) and return a grid whose axes
/// are exactly the windowed sub-axes, with `valid_time` set to the selected
/// time sample.
#[async_trait]
pub trait GriddedDataset: Send + Sync {
    /// Stable identifier for logs and error messages.
    fn id(&self) -> &str;

    /// The latitude axis in storage order.
    fn latitude(&self) -> &[f64];

    /// The longitude axis in storage order.
    fn longitude(&self) -> &[f64];

    /// The time axis. May be empty for a dataset with no samples yet.
    fn times(&self) -> &[DateTime<Utc>];

    /// Read one time slice restricted to the given index windows.
    async fn read_window(
        &self,
        time_index: usize,
        lat: AxisWindow,
        lon: AxisWindow,
    ) -> Result<ScalarGrid>;
}
