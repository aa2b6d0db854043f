//! Resampling one grid onto another grid's coordinate axes.

use crate::error::{PipelineError, Result};
use crate::grid::ScalarGrid;
use crate::orientation::{axis_extent, AxisOrientation};

/// Resampling method for grid alignment.
///
/// Nearest neighbor is the default: it is deterministic and never invents
/// values between valid and missing cells along cloud edges. Linear
/// interpolation is explicit opt-in; it propagates missing wherever a
/// contributing neighbor is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleMethod {
    #[default]
    Nearest,
    Linear,
}

/// Resample `source` onto `target`'s exact latitude/longitude axes.
///
/// Target cells outside the source's coordinate extent resolve to missing.
/// Disjoint extents are an error so callers can tell "valid but empty" from
/// "malformed"; partial overlap is not.
pub fn align_to(
    source: &ScalarGrid,
    target: &ScalarGrid,
    method: ResampleMethod,
) -> Result<ScalarGrid> {
    let (src_lat_min, src_lat_max) = source.lat_extent();
    let (src_lon_min, src_lon_max) = source.lon_extent();
    let (tgt_lat_min, tgt_lat_max) = target.lat_extent();
    let (tgt_lon_min, tgt_lon_max) = target.lon_extent();

    let lat_overlaps = src_lat_min <= tgt_lat_max && src_lat_max >= tgt_lat_min;
    let lon_overlaps = src_lon_min <= tgt_lon_max && src_lon_max >= tgt_lon_min;
    if !lat_overlaps || !lon_overlaps {
        return Err(PipelineError::DisjointGrids {
            src: format!(
                "lat [{src_lat_min}, {src_lat_max}] lon [{src_lon_min}, {src_lon_max}]"
            ),
            target: format!(
                "lat [{tgt_lat_min}, {tgt_lat_max}] lon [{tgt_lon_min}, {tgt_lon_max}]"
            ),
        });
    }

    let ncols = target.ncols();
    let mut data = vec![f32::NAN; target.nrows() * ncols];

    // Fractional source positions for every target coordinate, computed once
    // per axis.
    let row_pos: Vec<Option<f64>> = target
        .lat()
        .iter()
        .map(|&lat| fractional_index(source.lat(), lat))
        .collect();
    let col_pos: Vec<Option<f64>> = target
        .lon()
        .iter()
        .map(|&lon| fractional_index(source.lon(), lon))
        .collect();

    for (r, row_p) in row_pos.iter().enumerate() {
        for (c, col_p) in col_pos.iter().enumerate() {
            let (Some(y), Some(x)) = (*row_p, *col_p) else {
                continue; // outside source extent: stays missing
            };
            data[r * ncols + c] = match method {
                ResampleMethod::Nearest => sample_nearest(source, y, x),
                ResampleMethod::Linear => sample_linear(source, y, x),
            };
        }
    }

    let mut aligned = ScalarGrid::new(target.lat().to_vec(), target.lon().to_vec(), data)?;
    if let Some(t) = source.valid_time() {
        aligned = aligned.with_valid_time(t);
    }
    Ok(aligned)
}

/// Fractional position of `coord` along `axis`, or None outside the extent.
///
/// A return value of `i + f` (0 <= f < 1) means `coord` lies between
/// `axis[i]` and `axis[i+1]`, whatever the storage direction.
fn fractional_index(axis: &[f64], coord: f64) -> Option<f64> {
    let (min, max) = axis_extent(axis);
    if coord < min || coord > max {
        return None;
    }
    if axis.len() == 1 {
        return Some(0.0);
    }

    match AxisOrientation::of(axis) {
        AxisOrientation::Ascending => {
            // First index with value > coord; the segment is [i-1, i].
            let i = axis.partition_point(|&v| v <= coord);
            if i == 0 {
                return Some(0.0);
            }
            if i == axis.len() {
                return Some((axis.len() - 1) as f64);
            }
            let frac = (coord - axis[i - 1]) / (axis[i] - axis[i - 1]);
            Some((i - 1) as f64 + frac)
        }
        AxisOrientation::Descending => {
            // Values decrease; first index with value < coord.
            let i = axis.partition_point(|&v| v >= coord);
            if i == 0 {
                return Some(0.0);
            }
            if i == axis.len() {
                return Some((axis.len() - 1) as f64);
            }
            let frac = (axis[i - 1] - coord) / (axis[i - 1] - axis[i]);
            Some((i - 1) as f64 + frac)
        }
    }
}

fn sample_nearest(grid: &ScalarGrid, y: f64, x: f64) -> f32 {
    let row = (y.round() as usize).min(grid.nrows() - 1);
    let col = (x.round() as usize).min(grid.ncols() - 1);
    grid.get(row, col).unwrap_or(f32::NAN)
}

/// Bilinear sample with missing-data propagation.
///
/// Exact hits return the cell value directly, so aligning a grid onto its
/// own axes is the identity even next to missing cells. Otherwise any
/// missing contributing neighbor makes the result missing.
fn sample_linear(grid: &ScalarGrid, y: f64, x: f64) -> f32 {
    const EPS: f64 = 1e-9;

    let y0 = y.floor() as usize;
    let x0 = x.floor() as usize;
    let y1 = (y0 + 1).min(grid.nrows() - 1);
    let x1 = (x0 + 1).min(grid.ncols() - 1);
    let fy = (y - y0 as f64) as f32;
    let fx = (x - x0 as f64) as f32;

    let exact_row = (y - y0 as f64) < EPS;
    let exact_col = (x - x0 as f64) < EPS;

    let v00 = grid.get(y0, x0).unwrap_or(f32::NAN);
    if exact_row && exact_col {
        return v00;
    }

    if exact_row {
        let v01 = grid.get(y0, x1).unwrap_or(f32::NAN);
        return v00 * (1.0 - fx) + v01 * fx;
    }
    if exact_col {
        let v10 = grid.get(y1, x0).unwrap_or(f32::NAN);
        return v00 * (1.0 - fy) + v10 * fy;
    }

    let v01 = grid.get(y0, x1).unwrap_or(f32::NAN);
    let v10 = grid.get(y1, x0).unwrap_or(f32::NAN);
    let v11 = grid.get(y1, x1).unwrap_or(f32::NAN);
    if v00.is_nan() || v01.is_nan() || v10.is_nan() || v11.is_nan() {
        return f32::NAN;
    }

    let top = v00 * (1.0 - fx) + v01 * fx;
    let bottom = v10 * (1.0 - fx) + v11 * fx;
    top * (1.0 - fy) + bottom * fy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(lat: &[f64], lon: &[f64], data: &[f32]) -> ScalarGrid {
        ScalarGrid::new(lat.to_vec(), lon.to_vec(), data.to_vec()).unwrap()
    }

    #[test]
    fn test_self_alignment_is_identity() {
        let g = grid(
            &[20.0, 20.5, 21.0],
            &[-158.0, -157.5],
            &[1.0, 2.0, f32::NAN, 4.0, 5.0, 6.0],
        );

        for method in [ResampleMethod::Nearest, ResampleMethod::Linear] {
            let aligned = align_to(&g, &g, method).unwrap();
            for r in 0..3 {
                for c in 0..2 {
                    let orig = g.get(r, c).unwrap();
                    let out = aligned.get(r, c).unwrap();
                    if orig.is_nan() {
                        assert!(out.is_nan(), "missing not preserved at ({r},{c})");
                    } else {
                        assert!((out - orig).abs() < 1e-6);
                    }
                }
            }
        }
    }

    #[test]
    fn test_nearest_picks_closest_cell() {
        let src = grid(&[20.0, 21.0], &[-158.0, -157.0], &[1.0, 2.0, 3.0, 4.0]);
        // A single target point nearer to (21.0, -157.0).
        let tgt = grid(&[20.9], &[-157.1], &[0.0]);
        let aligned = align_to(&src, &tgt, ResampleMethod::Nearest).unwrap();
        assert_eq!(aligned.get(0, 0), Some(4.0));
    }

    #[test]
    fn test_linear_interpolates_midpoint() {
        let src = grid(&[20.0, 21.0], &[-158.0, -157.0], &[1.0, 2.0, 3.0, 4.0]);
        let tgt = grid(&[20.5], &[-157.5], &[0.0]);
        let aligned = align_to(&src, &tgt, ResampleMethod::Linear).unwrap();
        assert!((aligned.get(0, 0).unwrap() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_linear_propagates_missing_neighbor() {
        let src = grid(&[20.0, 21.0], &[-158.0, -157.0], &[1.0, f32::NAN, 3.0, 4.0]);
        let tgt = grid(&[20.5], &[-157.5], &[0.0]);
        let aligned = align_to(&src, &tgt, ResampleMethod::Linear).unwrap();
        assert!(aligned.get(0, 0).unwrap().is_nan());
        // Nearest neighbor at the same point stays deterministic and valid
        // or missing depending on the closest cell only.
        let nearest = align_to(&src, &tgt, ResampleMethod::Nearest).unwrap();
        assert!(!nearest.get(0, 0).unwrap().is_nan() || src.get(1, 1).unwrap().is_nan());
    }

    #[test]
    fn test_outside_extent_is_missing() {
        let src = grid(&[20.0, 21.0], &[-158.0, -157.0], &[1.0, 2.0, 3.0, 4.0]);
        // Overlaps in both axes, but one target row sits north of the source.
        let tgt = grid(&[20.5, 25.0], &[-157.5], &[0.0, 0.0]);
        let aligned = align_to(&src, &tgt, ResampleMethod::Nearest).unwrap();
        assert!(!aligned.get(0, 0).unwrap().is_nan());
        assert!(aligned.get(1, 0).unwrap().is_nan());
    }

    #[test]
    fn test_disjoint_extents_error() {
        let src = grid(&[20.0, 21.0], &[-158.0, -157.0], &[1.0, 2.0, 3.0, 4.0]);
        let tgt = grid(&[40.0, 41.0], &[-158.0, -157.0], &[0.0; 4]);
        let err = align_to(&src, &tgt, ResampleMethod::Nearest).unwrap_err();
        assert!(matches!(err, PipelineError::DisjointGrids { .. }));
    }

    #[test]
    fn test_descending_source_axis() {
        // Same field stored north-to-south.
        let src = grid(&[21.0, 20.0], &[-158.0, -157.0], &[3.0, 4.0, 1.0, 2.0]);
        let tgt = grid(&[20.0, 21.0], &[-158.0, -157.0], &[0.0; 4]);
        let aligned = align_to(&src, &tgt, ResampleMethod::Nearest).unwrap();
        assert_eq!(aligned.get(0, 0), Some(1.0));
        assert_eq!(aligned.get(1, 1), Some(4.0));
    }
}
