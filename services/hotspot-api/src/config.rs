//! Service configuration.
//!
//! Loaded from a YAML file; every field has a deployment-ready default for
//! Hawaiian waters, so a missing file just means "defaults".

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use fishspot_common::BoundingBox;

/// Root service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Default bounding box when a request does not pass one.
    #[serde(default = "default_bbox")]
    pub bbox: BoundingBox,

    /// ERDDAP server base URL.
    #[serde(default = "default_erddap_base")]
    pub erddap_base: String,

    #[serde(default = "default_sst_dataset")]
    pub sst: DatasetConfig,

    #[serde(default = "default_chl_dataset")]
    pub chl: DatasetConfig,

    /// Fetched-subset cache time-to-live in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Cap on hotspot markers per response.
    #[serde(default = "default_spot_cap")]
    pub spot_cap: usize,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub feed: FeedSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bbox: default_bbox(),
            erddap_base: default_erddap_base(),
            sst: default_sst_dataset(),
            chl: default_chl_dataset(),
            cache_ttl_secs: default_cache_ttl_secs(),
            spot_cap: default_spot_cap(),
            render: RenderConfig::default(),
            feed: FeedSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.bbox.validate()?;
        Ok(config)
    }
}

/// One griddap dataset reference.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub dataset_id: String,
    pub variable: String,
    /// Whether the dataset carries a singleton depth axis to squeeze.
    #[serde(default)]
    pub depth_axis: bool,
}

/// Rasterization defaults per field.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_sst_vmin")]
    pub sst_vmin: f32,
    #[serde(default = "default_sst_vmax")]
    pub sst_vmax: f32,
    #[serde(default = "default_sst_scale")]
    pub sst_scale: String,
    #[serde(default = "default_chl_vmin")]
    pub chl_vmin: f32,
    #[serde(default = "default_chl_vmax")]
    pub chl_vmax: f32,
    #[serde(default = "default_chl_scale")]
    pub chl_scale: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sst_vmin: default_sst_vmin(),
            sst_vmax: default_sst_vmax(),
            sst_scale: default_sst_scale(),
            chl_vmin: default_chl_vmin(),
            chl_vmax: default_chl_vmax(),
            chl_scale: default_chl_scale(),
        }
    }
}

/// Live-feed listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_feed_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_listen_window_secs")]
    pub listen_window_secs: u64,
    #[serde(default = "default_recv_timeout_secs")]
    pub recv_timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            endpoint: default_feed_endpoint(),
            listen_window_secs: default_listen_window_secs(),
            recv_timeout_secs: default_recv_timeout_secs(),
        }
    }
}

fn default_bbox() -> BoundingBox {
    // Main Hawaiian Islands offshore waters.
    BoundingBox::new(-161.0, 18.5, -155.0, 22.5)
}

fn default_erddap_base() -> String {
    "https://coastwatch.noaa.gov/erddap".to_string()
}

fn default_sst_dataset() -> DatasetConfig {
    DatasetConfig {
        dataset_id: "noaacrwsstDaily".to_string(),
        variable: "analysed_sst".to_string(),
        depth_axis: false,
    }
}

fn default_chl_dataset() -> DatasetConfig {
    DatasetConfig {
        dataset_id: "noaa_snpp_chla_daily".to_string(),
        variable: "chlor_a".to_string(),
        depth_axis: true,
    }
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_spot_cap() -> usize {
    12
}

fn default_sst_vmin() -> f32 {
    23.0
}

fn default_sst_vmax() -> f32 {
    29.0
}

fn default_sst_scale() -> String {
    "thermal".to_string()
}

fn default_chl_vmin() -> f32 {
    0.0
}

fn default_chl_vmax() -> f32 {
    1.0
}

fn default_chl_scale() -> String {
    "algae".to_string()
}

fn default_feed_endpoint() -> String {
    "wss://stream.aisstream.io/v0/stream".to_string()
}

fn default_listen_window_secs() -> u64 {
    5
}

fn default_recv_timeout_secs() -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = AppConfig::load(Path::new("/nonexistent/fishspot.yaml")).unwrap();
        assert_eq!(config.sst.dataset_id, "noaacrwsstDaily");
        assert_eq!(config.spot_cap, 12);
        assert!(config.chl.depth_axis);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let yaml = r#"
spot_cap: 15
sst:
  dataset_id: customSst
  variable: sst
"#;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();

        let config = AppConfig::load(f.path()).unwrap();
        assert_eq!(config.spot_cap, 15);
        assert_eq!(config.sst.dataset_id, "customSst");
        // Untouched sections keep defaults.
        assert_eq!(config.chl.dataset_id, "noaa_snpp_chla_daily");
        assert_eq!(config.render.sst_scale, "thermal");
    }

    #[test]
    fn test_rejects_degenerate_bbox() {
        let yaml = r#"
bbox:
  min_lon: -155.0
  min_lat: 18.5
  max_lon: -161.0
  max_lat: 22.5
"#;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();
        assert!(AppConfig::load(f.path()).is_err());
    }
}
