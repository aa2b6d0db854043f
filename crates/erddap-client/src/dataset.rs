//! Dataset handle over one griddap variable.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use grid_pipeline::{AxisWindow, GriddedDataset, PipelineError, ScalarGrid};

use crate::error::{ErddapError, Result};
use crate::response::{
    parse_grid_values, parse_numeric_axis, parse_table, parse_time_axis,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A handle on one scalar variable of an ERDDAP griddap dataset.
///
/// Axes are discovered once at open time. Reads use index subscripts in the
/// axes' own storage order, so axis direction never changes which cells a
/// window selects. Datasets with a degenerate altitude/depth axis get it
/// pinned at index 0 and collapsed from results.
pub struct ErddapDataset {
    client: reqwest::Client,
    base_url: String,
    dataset_id: String,
    variable: String,
    depth_axis: bool,
    latitude: Vec<f64>,
    longitude: Vec<f64>,
    times: Vec<DateTime<Utc>>,
}

impl ErddapDataset {
    /// Open a dataset handle, discovering its coordinate axes.
    pub async fn open(
        base_url: impl Into<String>,
        dataset_id: impl Into<String>,
        variable: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let dataset_id = dataset_id.into();
        let variable = variable.into();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ErddapError::Http {
                url: base_url.clone(),
                source,
            })?;

        let mut dataset = Self {
            client,
            base_url,
            dataset_id,
            variable,
            depth_axis: false,
            latitude: Vec::new(),
            longitude: Vec::new(),
            times: Vec::new(),
        };

        let time_body = dataset.fetch(&dataset.axis_url("time")).await?;
        dataset.times = parse_time_axis(&parse_table(&dataset.axis_url("time"), &time_body)?)?;

        let lat_body = dataset.fetch(&dataset.axis_url("latitude")).await?;
        dataset.latitude =
            parse_numeric_axis(&parse_table(&dataset.axis_url("latitude"), &lat_body)?, "latitude")?;

        let lon_body = dataset.fetch(&dataset.axis_url("longitude")).await?;
        dataset.longitude = parse_numeric_axis(
            &parse_table(&dataset.axis_url("longitude"), &lon_body)?,
            "longitude",
        )?;

        info!(
            dataset = %dataset.dataset_id,
            variable = %dataset.variable,
            times = dataset.times.len(),
            lat = dataset.latitude.len(),
            lon = dataset.longitude.len(),
            "opened griddap dataset"
        );
        Ok(dataset)
    }

    /// Mark the dataset as carrying a singleton depth axis between time and
    /// latitude; it is pinned at index 0 and squeezed out of results.
    pub fn with_depth_axis(mut self) -> Self {
        self.depth_axis = true;
        self
    }

    /// Base URL + dataset id, used as the cache key prefix.
    pub fn url(&self) -> String {
        format!("{}/griddap/{}", self.base_url, self.dataset_id)
    }

    fn axis_url(&self, axis: &str) -> String {
        format!("{}.json?{}[0:1:last]", self.url(), axis)
    }

    fn data_url(&self, time_index: usize, lat: AxisWindow, lon: AxisWindow) -> String {
        let depth = if self.depth_axis { "[0:0]" } else { "" };
        format!(
            "{}.json?{}[{}:{}]{}[{}:{}][{}:{}]",
            self.url(),
            self.variable,
            time_index,
            time_index,
            depth,
            lat.start,
            lat.end,
            lon.start,
            lon.end
        )
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(%url, "griddap request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ErddapError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ErddapError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| ErddapError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl GriddedDataset for ErddapDataset {
    fn id(&self) -> &str {
        &self.dataset_id
    }

    fn latitude(&self) -> &[f64] {
        &self.latitude
    }

    fn longitude(&self) -> &[f64] {
        &self.longitude
    }

    fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    async fn read_window(
        &self,
        time_index: usize,
        lat: AxisWindow,
        lon: AxisWindow,
    ) -> std::result::Result<ScalarGrid, PipelineError> {
        let url = self.data_url(time_index, lat, lon);
        let expected = lat.len() * lon.len();

        let body = self
            .fetch(&url)
            .await
            .map_err(|e| PipelineError::source(e.to_string()))?;
        let table = parse_table(&url, &body).map_err(|e| PipelineError::source(e.to_string()))?;
        let values = parse_grid_values(&table, &self.variable, expected)
            .map_err(|e| PipelineError::source(e.to_string()))?;

        let grid = ScalarGrid::new(
            self.latitude[lat.start..=lat.end].to_vec(),
            self.longitude[lon.start..=lon.end].to_vec(),
            values,
        )?;
        Ok(grid.with_valid_time(self.times[time_index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> ErddapDataset {
        ErddapDataset {
            client: reqwest::Client::new(),
            base_url: "https://coastwatch.noaa.gov/erddap".to_string(),
            dataset_id: "noaacrwsstDaily".to_string(),
            variable: "analysed_sst".to_string(),
            depth_axis: false,
            latitude: vec![18.5, 19.0],
            longitude: vec![-161.0, -160.5],
            times: Vec::new(),
        }
    }

    #[test]
    fn test_axis_url() {
        let ds = handle();
        assert_eq!(
            ds.axis_url("latitude"),
            "https://coastwatch.noaa.gov/erddap/griddap/noaacrwsstDaily.json?latitude[0:1:last]"
        );
    }

    #[test]
    fn test_data_url_uses_index_subscripts() {
        let ds = handle();
        let url = ds.data_url(
            7,
            AxisWindow { start: 120, end: 200 },
            AxisWindow { start: 40, end: 90 },
        );
        assert_eq!(
            url,
            "https://coastwatch.noaa.gov/erddap/griddap/noaacrwsstDaily.json?analysed_sst[7:7][120:200][40:90]"
        );
    }

    #[test]
    fn test_data_url_pins_depth_axis() {
        let ds = handle().with_depth_axis();
        let url = ds.data_url(
            0,
            AxisWindow { start: 0, end: 1 },
            AxisWindow { start: 0, end: 1 },
        );
        assert!(url.contains("[0:0][0:1][0:1]"));
    }
}
