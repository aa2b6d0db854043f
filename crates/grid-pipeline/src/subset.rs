//! Spatial subsetting of a dataset's most recent time slice.

use fishspot_common::BoundingBox;
use tracing::debug;

use crate::dataset::GriddedDataset;
use crate::error::{PipelineError, Result};
use crate::grid::ScalarGrid;
use crate::orientation::axis_window;

/// Extract the most recent time slice of `dataset`, restricted to `bbox`.
///
/// "Most recent" is the maximum value on the time axis, wherever it sits in
/// storage order. Index windows are resolved through the orientation
/// resolver, so a descending latitude axis selects the same cells as an
/// ascending one; a bounding box that misses the grid entirely is
/// `EmptyRegion`, never a silently empty result.
pub async fn latest_subset(
    dataset: &dyn GriddedDataset,
    bbox: &BoundingBox,
) -> Result<ScalarGrid> {
    let times = dataset.times();
    let time_index = times
        .iter()
        .enumerate()
        .max_by_key(|(_, t)| **t)
        .map(|(i, _)| i)
        .ok_or_else(|| PipelineError::NoTimeData {
            dataset: dataset.id().to_string(),
        })?;

    let lat_win = axis_window(dataset.latitude(), bbox.min_lat, bbox.max_lat)?;
    let lon_win = axis_window(dataset.longitude(), bbox.min_lon, bbox.max_lon)?;

    debug!(
        dataset = dataset.id(),
        time = %times[time_index],
        lat_window = ?lat_win,
        lon_window = ?lon_win,
        "subsetting latest slice"
    );

    let grid = dataset.read_window(time_index, lat_win, lon_win).await?;

    if grid.nrows() != lat_win.len() || grid.ncols() != lon_win.len() {
        return Err(PipelineError::source(format!(
            "dataset '{}' returned {}x{} for a {}x{} window",
            dataset.id(),
            grid.nrows(),
            grid.ncols(),
            lat_win.len(),
            lon_win.len()
        )));
    }

    Ok(grid)
}
