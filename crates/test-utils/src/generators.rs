//! Synthetic grid generators.

use grid_pipeline::ScalarGrid;

/// Evenly spaced axis of `n` values starting at `start` with step `step`.
/// Negative steps produce a descending axis.
pub fn axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Grid filled with a single value everywhere.
pub fn uniform_grid(lat: Vec<f64>, lon: Vec<f64>, value: f32) -> ScalarGrid {
    let len = lat.len() * lon.len();
    ScalarGrid::new(lat, lon, vec![value; len]).expect("valid test grid")
}

/// Grid where every cell of row `r` holds `row_values[r]`.
pub fn row_gradient_grid(lat: Vec<f64>, lon: Vec<f64>, row_values: &[f32]) -> ScalarGrid {
    assert_eq!(lat.len(), row_values.len());
    let ncols = lon.len();
    let data: Vec<f32> = row_values
        .iter()
        .flat_map(|&v| std::iter::repeat(v).take(ncols))
        .collect();
    ScalarGrid::new(lat, lon, data).expect("valid test grid")
}

/// Grid with every cell missing.
pub fn all_missing_grid(lat: Vec<f64>, lon: Vec<f64>) -> ScalarGrid {
    let len = lat.len() * lon.len();
    ScalarGrid::new(lat, lon, vec![f32::NAN; len]).expect("valid test grid")
}

/// Grid with alternating valid/missing cells, starting valid at (0, 0).
pub fn checkerboard_missing_grid(lat: Vec<f64>, lon: Vec<f64>, value: f32) -> ScalarGrid {
    let ncols = lon.len();
    let data: Vec<f32> = (0..lat.len() * ncols)
        .map(|i| {
            let (r, c) = (i / ncols, i % ncols);
            if (r + c) % 2 == 0 {
                value
            } else {
                f32::NAN
            }
        })
        .collect();
    ScalarGrid::new(lat, lon, data).expect("valid test grid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_descending() {
        let a = axis(22.5, -0.5, 3);
        assert_eq!(a, vec![22.5, 22.0, 21.5]);
    }

    #[test]
    fn test_checkerboard_half_missing() {
        let g = checkerboard_missing_grid(axis(20.0, 0.5, 2), axis(-158.0, 0.5, 2), 1.0);
        assert_eq!(g.valid_count(), 2);
    }
}
