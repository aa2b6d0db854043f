//! Shared value types for the fishspot workspace.
//!
//! Everything in this crate is a plain, serde-friendly value: bounding
//! boxes, species threshold profiles, and hotspot markers. No I/O beyond
//! loading the species table from a config file.

pub mod bbox;
pub mod hotspot;
pub mod species;

pub use bbox::{BboxError, BoundingBox};
pub use hotspot::Hotspot;
pub use species::{SpeciesError, SpeciesProfile, SpeciesTable};
