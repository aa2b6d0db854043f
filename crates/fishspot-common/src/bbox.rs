//! Bounding box type and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 degrees.
///
/// Longitudes follow the -180..180 convention used by the upstream
/// CoastWatch datasets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Parse a query-string BBOX parameter: "min_lon,min_lat,max_lon,max_lat"
    pub fn from_query_string(s: &str) -> Result<Self, BboxError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(BboxError::InvalidFormat(s.to_string()));
        }

        let bbox = Self {
            min_lon: parts[0]
                .trim()
                .parse()
                .map_err(|_| BboxError::InvalidNumber(parts[0].to_string()))?,
            min_lat: parts[1]
                .trim()
                .parse()
                .map_err(|_| BboxError::InvalidNumber(parts[1].to_string()))?,
            max_lon: parts[2]
                .trim()
                .parse()
                .map_err(|_| BboxError::InvalidNumber(parts[2].to_string()))?,
            max_lat: parts[3]
                .trim()
                .parse()
                .map_err(|_| BboxError::InvalidNumber(parts[3].to_string()))?,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check that min < max on both axes.
    pub fn validate(&self) -> Result<(), BboxError> {
        if self.min_lon >= self.max_lon || self.min_lat >= self.max_lat {
            return Err(BboxError::Degenerate {
                min_lon: self.min_lon,
                min_lat: self.min_lat,
                max_lon: self.max_lon,
                max_lat: self.max_lat,
            });
        }
        Ok(())
    }

    /// Width of the bounding box in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the bounding box in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lon < other.max_lon
            && self.max_lon > other.min_lon
            && self.min_lat < other.max_lat
            && self.max_lat > other.min_lat
    }

    /// Check if a point is contained within this bbox.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Generate a cache key fragment for this bbox (quantized to avoid
    /// floating point issues).
    pub fn cache_key(&self) -> String {
        format!(
            "{:.6}_{:.6}_{:.6}_{:.6}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxError {
    #[error("invalid BBOX format: {0}. Expected 'min_lon,min_lat,max_lon,max_lat'")]
    InvalidFormat(String),

    #[error("invalid number in BBOX: {0}")]
    InvalidNumber(String),

    #[error("degenerate BBOX: ({min_lon},{min_lat},{max_lon},{max_lat}) has min >= max")]
    Degenerate {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },
}
