//! Shared application state.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use erddap_client::{ErddapDataset, GridCache};
use fishspot_common::{BoundingBox, SpeciesTable};
use grid_pipeline::{latest_subset, PipelineError, ScalarGrid};
use vessel_feed::{FeedConfig, FeedCredentials};

use crate::config::AppConfig;

/// Which satellite field a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sst,
    Chl,
}

impl Field {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sst" | "temperature" => Some(Self::Sst),
            "chl" | "chlorophyll" => Some(Self::Chl),
            _ => None,
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub species: SpeciesTable,
    pub credentials: FeedCredentials,
    sst: ErddapDataset,
    chl: ErddapDataset,
    cache: GridCache,
}

impl AppState {
    /// Open both dataset handles and build the shared state.
    pub async fn new(config: AppConfig, species: SpeciesTable) -> Result<Self> {
        let sst = open_dataset(&config, &config.sst.dataset_id, &config.sst.variable, config.sst.depth_axis)
            .await
            .context("opening SST dataset")?;
        let chl = open_dataset(&config, &config.chl.dataset_id, &config.chl.variable, config.chl.depth_axis)
            .await
            .context("opening chlorophyll dataset")?;

        let credentials =
            FeedCredentials::from_env_value(std::env::var("AIS_API_KEY").ok());
        if credentials == FeedCredentials::Demo {
            info!("no AIS_API_KEY configured, vessel feed runs in demo mode");
        }

        let cache = GridCache::new(Duration::from_secs(config.cache_ttl_secs));

        Ok(Self {
            config,
            species,
            credentials,
            sst,
            chl,
            cache,
        })
    }

    /// Fetch the latest subset of a field, through the TTL cache.
    pub async fn fetch_subset(
        &self,
        field: Field,
        bbox: &BoundingBox,
    ) -> std::result::Result<ScalarGrid, PipelineError> {
        let dataset = match field {
            Field::Sst => &self.sst,
            Field::Chl => &self.chl,
        };

        let key = GridCache::key(&dataset.url(), bbox);
        if let Some(grid) = self.cache.get(&key) {
            debug!(%key, "grid cache hit");
            return Ok(grid);
        }

        let grid = latest_subset(dataset, bbox).await?;
        self.cache.insert(key, grid.clone());
        Ok(grid)
    }

    /// Listener settings as the feed crate wants them.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            endpoint: self.config.feed.endpoint.clone(),
            listen_window: Duration::from_secs(self.config.feed.listen_window_secs),
            recv_timeout: Duration::from_secs(self.config.feed.recv_timeout_secs),
        }
    }
}

async fn open_dataset(
    config: &AppConfig,
    dataset_id: &str,
    variable: &str,
    depth_axis: bool,
) -> Result<ErddapDataset> {
    let dataset = ErddapDataset::open(config.erddap_base.as_str(), dataset_id, variable).await?;
    Ok(if depth_axis {
        dataset.with_depth_axis()
    } else {
        dataset
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse() {
        assert_eq!(Field::parse("sst"), Some(Field::Sst));
        assert_eq!(Field::parse("SST"), Some(Field::Sst));
        assert_eq!(Field::parse("chlorophyll"), Some(Field::Chl));
        assert_eq!(Field::parse("salinity"), None);
    }
}
