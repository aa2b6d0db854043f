//! Deterministic simulated fleet.

use fishspot_common::BoundingBox;

use crate::VesselPosition;

/// Fixed fleet positions as (name, lon fraction, lat fraction) of the box.
const FLEET: &[(&str, f64, f64)] = &[
    ("Kai Lani", 0.22, 0.35),
    ("Makani Kai", 0.41, 0.62),
    ("Hoku Pa'a", 0.55, 0.28),
    ("Moana Ola", 0.68, 0.74),
    ("Nai'a", 0.80, 0.45),
    ("Ulua Runner", 0.33, 0.81),
];

/// The simulated fleet, placed at fixed fractions of the bounding box.
///
/// Clearly-labeled stand-in data for deployments without a live-feed key;
/// same box in, same fleet out.
pub fn demo_fleet(bbox: &BoundingBox) -> Vec<VesselPosition> {
    FLEET
        .iter()
        .map(|&(name, fx, fy)| VesselPosition {
            name: name.to_string(),
            lon: bbox.min_lon + fx * bbox.width(),
            lat: bbox.min_lat + fy * bbox.height(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_is_deterministic_and_inside_bbox() {
        let bbox = BoundingBox::new(-161.0, 18.5, -155.0, 22.5);
        let a = demo_fleet(&bbox);
        let b = demo_fleet(&bbox);
        assert_eq!(a, b);
        assert_eq!(a.len(), FLEET.len());
        for vessel in &a {
            assert!(bbox.contains(vessel.lon, vessel.lat), "{:?}", vessel);
        }
    }

    #[test]
    fn test_fleet_scales_with_bbox() {
        let small = BoundingBox::new(-158.0, 20.0, -157.0, 21.0);
        for vessel in demo_fleet(&small) {
            assert!(small.contains(vessel.lon, vessel.lat));
        }
    }
}
