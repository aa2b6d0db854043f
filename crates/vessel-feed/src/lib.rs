//! Live vessel position feed.
//!
//! A single-pass, wall-clock-bounded listener on an AIS position-report
//! stream. The listener is best-effort by contract: ordinary receive
//! timeouts return whatever was collected so far, and connection or auth
//! failures surface as `FeedError::Unavailable` for the caller to report —
//! they never crash the dashboard or block the satellite imagery.
//!
//! "No API key configured" is the explicit `FeedCredentials::Demo` state,
//! which yields a deterministic simulated fleet without touching the
//! network.

pub mod demo;
pub mod listener;

use serde::{Deserialize, Serialize};

pub use demo::demo_fleet;
pub use listener::{collect_positions, FeedConfig};

/// One vessel position report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselPosition {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Live-feed credential state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCredentials {
    /// A configured API key for the live stream.
    Key(String),
    /// No key configured; serve the simulated fleet.
    Demo,
}

impl FeedCredentials {
    /// Interpret an optional environment value: missing or blank means demo.
    pub fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(key) if !key.trim().is_empty() => Self::Key(key),
            _ => Self::Demo,
        }
    }
}

/// How a vessel collection was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    Live,
    Demo,
}

/// The outcome of one collection pass.
#[derive(Debug, Clone)]
pub struct FeedReport {
    pub mode: FeedMode,
    pub vessels: Vec<VesselPosition>,
}

/// Errors from the live-feed boundary.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Connection, handshake or authentication failure. Callers surface
    /// this as a warning, never a crash.
    #[error("live feed unavailable: {0}")]
    Unavailable(String),
}
