//! Per-species threshold classification.

use fishspot_common::SpeciesProfile;

use crate::error::{PipelineError, Result};
use crate::grid::{MaskGrid, ScalarGrid};

/// Axis comparison tolerance for pre-aligned grids. Aligned grids share
/// axis vectors by construction, so this only rejects misuse.
const AXIS_TOLERANCE: f64 = 1e-9;

/// Classify cells where both fields fall inside the species' ranges.
///
/// A cell is true iff `temp_min <= t <= temp_max` and
/// `chl_min <= c < chl_max` (food upper bound exclusive, so adjacent bands
/// never double-classify) and both inputs are valid there. Missing in
/// either input forces false. Pure function of its arguments.
pub fn classify(
    temperature: &ScalarGrid,
    food: &ScalarGrid,
    profile: &SpeciesProfile,
) -> Result<MaskGrid> {
    if temperature.shape() != food.shape() || !temperature.same_axes(food, AXIS_TOLERANCE) {
        return Err(PipelineError::GridMismatch {
            left: format!("{:?}", temperature.shape()),
            right: format!("{:?}", food.shape()),
        });
    }

    let mask = temperature
        .data()
        .iter()
        .zip(food.data())
        .map(|(&t, &c)| {
            !t.is_nan()
                && !c.is_nan()
                && t >= profile.temp_min
                && t <= profile.temp_max
                && c >= profile.chl_min
                && c < profile.chl_max
        })
        .collect();

    Ok(MaskGrid::from_parts(
        temperature.lat().to_vec(),
        temperature.lon().to_vec(),
        mask,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fishspot_common::SpeciesTable;

    fn profile(temp: (f32, f32), chl: (f32, f32)) -> SpeciesProfile {
        SpeciesProfile {
            name: "test".to_string(),
            display_name: "Test".to_string(),
            temp_min: temp.0,
            temp_max: temp.1,
            chl_min: chl.0,
            chl_max: chl.1,
            color: "#ffffff".to_string(),
            notes: String::new(),
        }
    }

    fn grid(lat: &[f64], lon: &[f64], data: &[f32]) -> ScalarGrid {
        ScalarGrid::new(lat.to_vec(), lon.to_vec(), data.to_vec()).unwrap()
    }

    #[test]
    fn test_bounds_inclusive_and_exclusive() {
        let lat = [20.0];
        let lon = [-158.0, -157.0, -156.0, -155.0];
        let temp = grid(&lat, &lon, &[25.5, 27.5, 26.0, 26.0]);
        let food = grid(&lat, &lon, &[0.2, 0.2, 0.15, 0.4]);
        let p = profile((25.5, 27.5), (0.15, 0.4));

        let mask = classify(&temp, &food, &p).unwrap();
        // Temperature bounds inclusive on both ends.
        assert_eq!(mask.get(0, 0), Some(true));
        assert_eq!(mask.get(0, 1), Some(true));
        // Food lower bound inclusive, upper bound exclusive.
        assert_eq!(mask.get(0, 2), Some(true));
        assert_eq!(mask.get(0, 3), Some(false));
    }

    #[test]
    fn test_missing_forces_false() {
        let lat = [20.0];
        let lon = [-158.0, -157.0, -156.0];
        let temp = grid(&lat, &lon, &[26.0, f32::NAN, 26.0]);
        let food = grid(&lat, &lon, &[0.2, 0.2, f32::NAN]);
        let p = profile((25.0, 28.0), (0.1, 0.5));

        let mask = classify(&temp, &food, &p).unwrap();
        assert_eq!(mask.get(0, 0), Some(true));
        assert_eq!(mask.get(0, 1), Some(false));
        assert_eq!(mask.get(0, 2), Some(false));
    }

    #[test]
    fn test_deterministic() {
        let lat = [20.0, 21.0];
        let lon = [-158.0, -157.0];
        let temp = grid(&lat, &lon, &[24.0, 26.0, 27.0, 30.0]);
        let food = grid(&lat, &lon, &[0.1, 0.2, 0.3, 0.4]);
        let table = SpeciesTable::builtin();
        let ahi = table.get("ahi").unwrap();

        let a = classify(&temp, &food, ahi).unwrap();
        let b = classify(&temp, &food, ahi).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_mismatched_grids_rejected() {
        let temp = grid(&[20.0], &[-158.0, -157.0], &[26.0, 26.0]);
        let food = grid(&[20.0, 21.0], &[-158.0], &[0.2, 0.2]);
        let p = profile((25.0, 28.0), (0.1, 0.5));
        assert!(matches!(
            classify(&temp, &food, &p),
            Err(PipelineError::GridMismatch { .. })
        ));
    }

    #[test]
    fn test_shifted_axes_rejected() {
        let temp = grid(&[20.0], &[-158.0, -157.0], &[26.0, 26.0]);
        let food = grid(&[20.1], &[-158.0, -157.0], &[0.2, 0.2]);
        let p = profile((25.0, 28.0), (0.1, 0.5));
        assert!(classify(&temp, &food, &p).is_err());
    }
}
