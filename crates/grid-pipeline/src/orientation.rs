//! Coordinate axis orientation resolution.
//!
//! Upstream grids store latitude north-to-south or south-to-north depending
//! on the product, and range-selection primitives want their bounds in the
//! axis's own storage direction. Every subset in the workspace goes through
//! this module; nothing else guesses axis direction.

use crate::error::{PipelineError, Result};

/// Storage direction of a coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    Ascending,
    Descending,
}

impl AxisOrientation {
    /// Determine the orientation of an ordered coordinate sequence.
    ///
    /// Length-0 and length-1 sequences are treated as ascending.
    pub fn of(axis: &[f64]) -> Self {
        match (axis.first(), axis.last()) {
            (Some(first), Some(last)) if first > last => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

/// Validate that an axis is strictly monotonic and return its orientation.
pub fn check_monotonic(axis: &[f64]) -> Result<AxisOrientation> {
    let orientation = AxisOrientation::of(axis);
    let ok = match orientation {
        AxisOrientation::Ascending => axis.windows(2).all(|w| w[0] < w[1]),
        AxisOrientation::Descending => axis.windows(2).all(|w| w[0] > w[1]),
    };
    if !ok {
        return Err(PipelineError::invalid_grid(
            "coordinate axis is not strictly monotonic",
        ));
    }
    Ok(orientation)
}

/// An inclusive index window into an axis, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisWindow {
    pub start: usize,
    pub end: usize,
}

impl AxisWindow {
    /// Number of samples covered by the window. Always >= 1: an empty
    /// selection is an error, never a window.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Resolve the storage-order index window covering the interval `[lo, hi]`.
///
/// Works for ascending and descending axes alike. Returns `EmptyRegion` when
/// the interval does not intersect the axis extent.
pub fn axis_window(axis: &[f64], lo: f64, hi: f64) -> Result<AxisWindow> {
    let mut start = None;
    let mut end = 0usize;

    for (i, &v) in axis.iter().enumerate() {
        if v >= lo && v <= hi {
            if start.is_none() {
                start = Some(i);
            }
            end = i;
        }
    }

    match start {
        Some(start) => Ok(AxisWindow { start, end }),
        None => {
            let (min, max) = axis_extent(axis);
            Err(PipelineError::EmptyRegion {
                requested: format!("[{lo}, {hi}]"),
                extent: format!("[{min}, {max}]"),
            })
        }
    }
}

/// Return `(lo, hi)` ordered in the axis's own storage direction.
///
/// Selection primitives that take value bounds (rather than indices) yield
/// empty results when the bounds oppose the storage direction; this is the
/// single place that adapts them.
pub fn oriented_bounds(axis: &[f64], lo: f64, hi: f64) -> (f64, f64) {
    match AxisOrientation::of(axis) {
        AxisOrientation::Ascending => (lo, hi),
        AxisOrientation::Descending => (hi, lo),
    }
}

/// The `(min, max)` value extent of an axis, regardless of orientation.
pub fn axis_extent(axis: &[f64]) -> (f64, f64) {
    match AxisOrientation::of(axis) {
        AxisOrientation::Ascending => (
            axis.first().copied().unwrap_or(f64::NAN),
            axis.last().copied().unwrap_or(f64::NAN),
        ),
        AxisOrientation::Descending => (
            axis.last().copied().unwrap_or(f64::NAN),
            axis.first().copied().unwrap_or(f64::NAN),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_detection() {
        assert_eq!(
            AxisOrientation::of(&[18.5, 19.0, 19.5]),
            AxisOrientation::Ascending
        );
        assert_eq!(
            AxisOrientation::of(&[22.5, 22.0, 21.5]),
            AxisOrientation::Descending
        );
        // Length-1 sequences are ascending by convention.
        assert_eq!(AxisOrientation::of(&[20.0]), AxisOrientation::Ascending);
        assert_eq!(AxisOrientation::of(&[]), AxisOrientation::Ascending);
    }

    #[test]
    fn test_oriented_bounds_preserves_for_ascending() {
        let axis = [18.5, 19.0, 19.5, 20.0];
        assert_eq!(oriented_bounds(&axis, 18.5, 20.0), (18.5, 20.0));
    }

    #[test]
    fn test_oriented_bounds_swaps_for_descending() {
        let axis = [20.0, 19.5, 19.0, 18.5];
        assert_eq!(oriented_bounds(&axis, 18.5, 20.0), (20.0, 18.5));
    }

    #[test]
    fn test_window_ascending() {
        let axis = [18.0, 19.0, 20.0, 21.0, 22.0];
        let w = axis_window(&axis, 19.0, 21.0).unwrap();
        assert_eq!(w, AxisWindow { start: 1, end: 3 });
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_window_descending() {
        let axis = [22.0, 21.0, 20.0, 19.0, 18.0];
        let w = axis_window(&axis, 19.0, 21.0).unwrap();
        assert_eq!(w, AxisWindow { start: 1, end: 3 });
    }

    #[test]
    fn test_window_partial_overlap() {
        let axis = [18.0, 19.0, 20.0];
        let w = axis_window(&axis, 19.5, 25.0).unwrap();
        assert_eq!(w, AxisWindow { start: 2, end: 2 });
    }

    #[test]
    fn test_window_outside_extent_errors() {
        let axis = [18.0, 19.0, 20.0];
        let err = axis_window(&axis, 30.0, 40.0).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PipelineError::EmptyRegion { .. }
        ));
    }

    #[test]
    fn test_check_monotonic() {
        assert!(check_monotonic(&[1.0, 2.0, 3.0]).is_ok());
        assert!(check_monotonic(&[3.0, 2.0, 1.0]).is_ok());
        assert!(check_monotonic(&[1.0, 1.0, 2.0]).is_err());
        assert!(check_monotonic(&[1.0, 3.0, 2.0]).is_err());
    }
}
