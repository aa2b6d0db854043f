//! Species threshold profiles.
//!
//! The classifier is data-driven: each target species is a record of
//! numeric ranges, not a branch in code. The built-in table carries the
//! winter-season Hawaiian pelagics; deployments can override it with a
//! YAML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Habitat thresholds for one target species.
///
/// Temperature bounds are inclusive on both ends. The chlorophyll upper
/// bound is exclusive so adjacent bands never double-classify a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Lookup key, e.g. "ahi".
    pub name: String,
    /// Human-readable name, e.g. "Ahi (Yellowfin)".
    pub display_name: String,
    /// Minimum sea-surface temperature in °C (inclusive).
    pub temp_min: f32,
    /// Maximum sea-surface temperature in °C (inclusive).
    pub temp_max: f32,
    /// Minimum chlorophyll-a in mg/m³ (inclusive).
    pub chl_min: f32,
    /// Maximum chlorophyll-a in mg/m³ (exclusive).
    pub chl_max: f32,
    /// Marker color as "#rrggbb".
    pub color: String,
    /// Free-text fishing notes shown alongside the thresholds.
    #[serde(default)]
    pub notes: String,
}

impl SpeciesProfile {
    /// Parse the display color into RGB components.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        hex_to_rgb(&self.color)
    }
}

/// Parse a "#rrggbb" hex color string to RGB.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// The full species threshold table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesTable {
    pub species: Vec<SpeciesProfile>,
}

impl SpeciesTable {
    /// Load a species table from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SpeciesError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SpeciesError::Io(path.as_ref().display().to_string(), e))?;
        let table: SpeciesTable = serde_yaml::from_str(&content)?;
        table.validate()?;
        Ok(table)
    }

    /// Check that every profile has coherent ranges and a unique name.
    pub fn validate(&self) -> Result<(), SpeciesError> {
        for profile in &self.species {
            if profile.temp_min > profile.temp_max || profile.chl_min >= profile.chl_max {
                return Err(SpeciesError::InvalidRange(profile.name.clone()));
            }
            if profile.rgb().is_none() {
                return Err(SpeciesError::InvalidColor {
                    species: profile.name.clone(),
                    color: profile.color.clone(),
                });
            }
        }
        for (i, a) in self.species.iter().enumerate() {
            if self.species[i + 1..].iter().any(|b| b.name == a.name) {
                return Err(SpeciesError::DuplicateName(a.name.clone()));
            }
        }
        Ok(())
    }

    /// Look up a profile by key (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&SpeciesProfile> {
        self.species
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// The built-in winter-season table for Hawaiian waters.
    pub fn builtin() -> Self {
        let mk = |name: &str,
                  display_name: &str,
                  temp: (f32, f32),
                  chl: (f32, f32),
                  color: &str,
                  notes: &str| SpeciesProfile {
            name: name.to_string(),
            display_name: display_name.to_string(),
            temp_min: temp.0,
            temp_max: temp.1,
            chl_min: chl.0,
            chl_max: chl.1,
            color: color.to_string(),
            notes: notes.to_string(),
        };

        Self {
            species: vec![
                mk(
                    "ahi",
                    "Ahi (Yellowfin)",
                    (24.5, 28.0),
                    (0.08, 0.35),
                    "#ffd400",
                    "Standard Ahi logic. They like that perfect 76-82°F water. Look for clean edges.",
                ),
                mk(
                    "ono",
                    "Ono (Wahoo)",
                    (25.0, 28.5),
                    (0.05, 0.25),
                    "#b0b0b0",
                    "Ono are speed demons. They hug the ledges. Look for sharp temp breaks!",
                ),
                mk(
                    "mahi",
                    "Mahi (Dorado)",
                    (25.5, 29.5),
                    (0.1, 0.5),
                    "#2ecc40",
                    "Mahi love the 'rubbish' water. High bait, warm temp. If it's green, check it unseen.",
                ),
                mk(
                    "nairagi",
                    "Nairagi (Striped Marlin)",
                    (20.0, 25.0),
                    (0.05, 0.2),
                    "#4aa3ff",
                    "Winter special: Nairagi love the cooler water (68-77°F). Best time of year for them.",
                ),
                mk(
                    "hebi",
                    "Hebi (Shortbill Spearfish)",
                    (21.0, 25.5),
                    (0.05, 0.25),
                    "#9b59b6",
                    "Hebi are aggressive right now. Transition zones, slightly cooler than Ahi.",
                ),
                mk(
                    "aku",
                    "Aku (Skipjack)",
                    (23.0, 28.0),
                    (0.15, 0.6),
                    "#e74c3c",
                    "Aku are hungry year-round. High-chlorophyll bait balls. Look for the birds!",
                ),
                mk(
                    "bigeye",
                    "Bigeye Ahi (Deep Ahi)",
                    (22.0, 26.0),
                    (0.05, 0.3),
                    "#e67e22",
                    "Bigeye stay deep but come up at low light. Looking for cooler surface patches.",
                ),
                mk(
                    "kajiki",
                    "Kajiki (Blue Marlin)",
                    (26.0, 29.0),
                    (0.02, 0.15),
                    "#1b4f9c",
                    "Big Momma. Warmest, cleanest blue water you can find. Don't go in the green stuff.",
                ),
            ],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpeciesError {
    #[error("failed to read species table {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("failed to parse species table: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("species '{0}' has an invalid threshold range")]
    InvalidRange(String),

    #[error("species '{species}' has invalid color '{color}'")]
    InvalidColor { species: String, color: String },

    #[error("duplicate species name '{0}'")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = SpeciesTable::builtin();
        assert!(table.validate().is_ok());
        assert_eq!(table.species.len(), 8);
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let table = SpeciesTable::builtin();
        assert!(table.get("ahi").is_some());
        assert!(table.get("AHI").is_some());
        assert!(table.get("tilapia").is_none());
    }

    #[test]
    fn test_profile_rgb() {
        let table = SpeciesTable::builtin();
        let ahi = table.get("ahi").unwrap();
        assert_eq!(ahi.rgb(), Some((0xff, 0xd4, 0x00)));
    }

    #[test]
    fn test_from_file() {
        let yaml = r##"
species:
  - name: ahi
    display_name: "Ahi (Yellowfin)"
    temp_min: 24.5
    temp_max: 28.0
    chl_min: 0.08
    chl_max: 0.35
    color: "#ffd400"
"##;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();

        let table = SpeciesTable::from_file(f.path()).unwrap();
        assert_eq!(table.species.len(), 1);
        assert_eq!(table.get("ahi").unwrap().temp_max, 28.0);
        // notes defaults to empty
        assert!(table.get("ahi").unwrap().notes.is_empty());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut table = SpeciesTable::builtin();
        table.species[0].temp_min = 30.0;
        assert!(matches!(
            table.validate(),
            Err(SpeciesError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let mut table = SpeciesTable::builtin();
        let dup = table.species[0].clone();
        table.species.push(dup);
        assert!(matches!(
            table.validate(),
            Err(SpeciesError::DuplicateName(_))
        ));
    }
}
