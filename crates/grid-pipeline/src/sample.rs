//! Bounded, evenly-spaced sampling of qualifying cells.

use rand::seq::index::sample as index_sample;
use rand::{rngs::StdRng, SeedableRng};

use crate::grid::MaskGrid;

/// Default cap on hotspot markers per render pass.
pub const DEFAULT_SPOT_CAP: usize = 12;

/// Select at most `cap` representative (lat, lon) points from the
/// qualifying cells.
///
/// Coverage-sampling policy, not a statistical sample: qualifying cells are
/// flattened in row-major (latitude-major) order, then `cap` indices are
/// picked evenly across that list — first index 0, last index count-1, the
/// rest linearly interpolated and rounded, duplicates collapsed. With
/// `count <= cap` every qualifying cell is returned; zero qualifying cells
/// is a normal empty result. Identical masks always yield identical points.
pub fn sample_spots(mask: &MaskGrid, cap: usize) -> Vec<(f64, f64)> {
    let cells: Vec<(usize, usize)> = mask.iter_true().collect();
    let n = cells.len();
    if n == 0 || cap == 0 {
        return Vec::new();
    }

    let picked: Vec<&(usize, usize)> = if n <= cap {
        cells.iter().collect()
    } else if cap == 1 {
        vec![&cells[0]]
    } else {
        let mut picked = Vec::with_capacity(cap);
        let mut last = usize::MAX;
        for i in 0..cap {
            let idx = (i as f64 * (n - 1) as f64 / (cap - 1) as f64).round() as usize;
            if idx != last {
                picked.push(&cells[idx]);
                last = idx;
            }
        }
        picked
    };

    picked
        .into_iter()
        .map(|&(r, c)| (mask.lat()[r], mask.lon()[c]))
        .collect()
}

/// Opt-in randomized sampling mode.
///
/// Draws up to `cap` qualifying cells without replacement using the given
/// seed; reproducible per seed. Output preserves row-major cell order.
pub fn sample_spots_random(mask: &MaskGrid, cap: usize, seed: u64) -> Vec<(f64, f64)> {
    let cells: Vec<(usize, usize)> = mask.iter_true().collect();
    let n = cells.len();
    if n == 0 || cap == 0 {
        return Vec::new();
    }
    if n <= cap {
        return cells
            .into_iter()
            .map(|(r, c)| (mask.lat()[r], mask.lon()[c]))
            .collect();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices = index_sample(&mut rng, n, cap).into_vec();
    indices.sort_unstable();
    indices
        .into_iter()
        .map(|i| {
            let (r, c) = cells[i];
            (mask.lat()[r], mask.lon()[c])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(n_true: usize, ncols: usize, nrows: usize) -> MaskGrid {
        let lat: Vec<f64> = (0..nrows).map(|i| 20.0 + i as f64 * 0.1).collect();
        let lon: Vec<f64> = (0..ncols).map(|i| -158.0 + i as f64 * 0.1).collect();
        let mask: Vec<bool> = (0..nrows * ncols).map(|i| i < n_true).collect();
        MaskGrid::from_parts(lat, lon, mask)
    }

    #[test]
    fn test_returns_all_when_under_cap() {
        let mask = mask_with(6, 3, 3);
        let spots = sample_spots(&mask, 10);
        assert_eq!(spots.len(), 6);
    }

    #[test]
    fn test_caps_output_length() {
        let mask = mask_with(100, 10, 10);
        let spots = sample_spots(&mask, 12);
        assert_eq!(spots.len(), 12);
    }

    #[test]
    fn test_empty_mask_is_empty_result() {
        let mask = mask_with(0, 3, 3);
        assert!(sample_spots(&mask, 10).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let mask = mask_with(57, 10, 10);
        assert_eq!(sample_spots(&mask, 12), sample_spots(&mask, 12));
    }

    #[test]
    fn test_endpoints_included() {
        let mask = mask_with(50, 10, 10);
        let cells: Vec<(usize, usize)> = mask.iter_true().collect();
        let spots = sample_spots(&mask, 5);
        let first = cells[0];
        let last = cells[49];
        assert_eq!(spots[0], (mask.lat()[first.0], mask.lon()[first.1]));
        assert_eq!(
            *spots.last().unwrap(),
            (mask.lat()[last.0], mask.lon()[last.1])
        );
    }

    #[test]
    fn test_cap_larger_than_count_returns_each_cell_once() {
        let mask = mask_with(2, 3, 1);
        let spots = sample_spots(&mask, 5);
        assert_eq!(spots.len(), 2);
        assert_ne!(spots[0], spots[1]);
    }

    #[test]
    fn test_cap_one() {
        let mask = mask_with(50, 10, 10);
        assert_eq!(sample_spots(&mask, 1).len(), 1);
    }

    #[test]
    fn test_random_mode_reproducible_per_seed() {
        let mask = mask_with(80, 10, 10);
        let a = sample_spots_random(&mask, 10, 42);
        let b = sample_spots_random(&mask, 10, 42);
        let c = sample_spots_random(&mask, 10, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        assert_ne!(a, c);
    }
}
