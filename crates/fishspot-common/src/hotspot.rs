//! Hotspot marker type.

use serde::{Deserialize, Serialize};

/// A single map marker for a qualifying grid cell.
///
/// Produced per render pass by the classifier and sampler; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub lat: f64,
    pub lon: f64,
    /// Species lookup key this marker belongs to.
    pub species: String,
    /// Display color as "#rrggbb".
    pub color: String,
}

impl Hotspot {
    pub fn new(lat: f64, lon: f64, species: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            species: species.into(),
            color: color.into(),
        }
    }
}
