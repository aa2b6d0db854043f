//! Gridded scalar field types.

use chrono::{DateTime, Utc};

use crate::error::{PipelineError, Result};
use crate::orientation::{axis_extent, check_monotonic};

/// A 2-D scalar field sampled on a rectilinear lat/lon grid.
///
/// Values are stored row-major (latitude-major) with `f32::NAN` marking
/// missing cells (cloud cover, land, sensor gaps). Both coordinate axes are
/// strictly monotonic, ascending or descending; the storage order is
/// whatever the upstream dataset used.
#[derive(Debug, Clone)]
pub struct ScalarGrid {
    lat: Vec<f64>,
    lon: Vec<f64>,
    data: Vec<f32>,
    valid_time: Option<DateTime<Utc>>,
}

impl ScalarGrid {
    /// Create a grid, validating shape and axis monotonicity.
    pub fn new(lat: Vec<f64>, lon: Vec<f64>, data: Vec<f32>) -> Result<Self> {
        if lat.is_empty() || lon.is_empty() {
            return Err(PipelineError::invalid_grid("grid axes must be non-empty"));
        }
        check_monotonic(&lat)?;
        check_monotonic(&lon)?;
        if data.len() != lat.len() * lon.len() {
            return Err(PipelineError::invalid_grid(format!(
                "data length {} does not match {}x{} grid",
                data.len(),
                lat.len(),
                lon.len()
            )));
        }
        Ok(Self {
            lat,
            lon,
            data,
            valid_time: None,
        })
    }

    /// Attach the source time slice this grid was cut from.
    pub fn with_valid_time(mut self, time: DateTime<Utc>) -> Self {
        self.valid_time = Some(time);
        self
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn valid_time(&self) -> Option<DateTime<Utc>> {
        self.valid_time
    }

    /// Grid shape as (rows, cols) = (len(lat), len(lon)).
    pub fn shape(&self) -> (usize, usize) {
        (self.lat.len(), self.lon.len())
    }

    pub fn nrows(&self) -> usize {
        self.lat.len()
    }

    pub fn ncols(&self) -> usize {
        self.lon.len()
    }

    /// Raw row-major values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at (row, col), or None out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.nrows() || col >= self.ncols() {
            return None;
        }
        Some(self.data[row * self.ncols() + col])
    }

    /// Number of non-missing cells.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    pub fn is_all_missing(&self) -> bool {
        self.valid_count() == 0
    }

    /// `(min, max)` latitude extent regardless of storage orientation.
    pub fn lat_extent(&self) -> (f64, f64) {
        axis_extent(&self.lat)
    }

    /// `(min, max)` longitude extent regardless of storage orientation.
    pub fn lon_extent(&self) -> (f64, f64) {
        axis_extent(&self.lon)
    }

    /// Whether another grid shares this grid's coordinate indices.
    pub fn same_axes(&self, other: &ScalarGrid, tolerance: f64) -> bool {
        axes_equal(&self.lat, &other.lat, tolerance) && axes_equal(&self.lon, &other.lon, tolerance)
    }
}

fn axes_equal(a: &[f64], b: &[f64], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}

/// Boolean classification result over a `ScalarGrid`'s cells.
#[derive(Debug, Clone)]
pub struct MaskGrid {
    lat: Vec<f64>,
    lon: Vec<f64>,
    mask: Vec<bool>,
}

impl MaskGrid {
    pub(crate) fn from_parts(lat: Vec<f64>, lon: Vec<f64>, mask: Vec<bool>) -> Self {
        debug_assert_eq!(mask.len(), lat.len() * lon.len());
        Self { lat, lon, mask }
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.lat.len(), self.lon.len())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row >= self.lat.len() || col >= self.lon.len() {
            return None;
        }
        Some(self.mask[row * self.lon.len() + col])
    }

    /// Number of qualifying cells.
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Qualifying cells as (row, col), in row-major order.
    pub fn iter_true(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let ncols = self.lon.len();
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, &m)| m)
            .map(move |(i, _)| (i / ncols, i % ncols))
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_shape() {
        let grid = ScalarGrid::new(vec![1.0, 2.0], vec![10.0, 11.0, 12.0], vec![0.0; 6]);
        assert!(grid.is_ok());

        let bad = ScalarGrid::new(vec![1.0, 2.0], vec![10.0, 11.0, 12.0], vec![0.0; 5]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_new_rejects_non_monotonic_axis() {
        let bad = ScalarGrid::new(vec![1.0, 3.0, 2.0], vec![10.0], vec![0.0; 3]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_accessors() {
        let grid = ScalarGrid::new(
            vec![20.0, 21.0],
            vec![-158.0, -157.0, -156.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, f32::NAN],
        )
        .unwrap();

        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.get(0, 0), Some(1.0));
        assert_eq!(grid.get(1, 1), Some(5.0));
        assert!(grid.get(1, 2).unwrap().is_nan());
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.valid_count(), 5);
    }

    #[test]
    fn test_extents_for_descending_axis() {
        let grid = ScalarGrid::new(vec![22.0, 21.0, 20.0], vec![-158.0], vec![0.0; 3]).unwrap();
        assert_eq!(grid.lat_extent(), (20.0, 22.0));
    }

    #[test]
    fn test_mask_iter_true_row_major() {
        let mask = MaskGrid::from_parts(
            vec![20.0, 21.0],
            vec![-158.0, -157.0],
            vec![true, false, false, true],
        );
        let cells: Vec<_> = mask.iter_true().collect();
        assert_eq!(cells, vec![(0, 0), (1, 1)]);
        assert_eq!(mask.count(), 2);
    }
}
