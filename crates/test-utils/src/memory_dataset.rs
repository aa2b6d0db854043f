//! In-memory `GriddedDataset` for tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use grid_pipeline::{AxisWindow, GriddedDataset, PipelineError, ScalarGrid};

/// A fully in-memory dataset: one full-domain grid per time sample.
pub struct MemoryDataset {
    id: String,
    lat: Vec<f64>,
    lon: Vec<f64>,
    times: Vec<DateTime<Utc>>,
    slices: Vec<Vec<f32>>,
}

impl MemoryDataset {
    pub fn new(
        id: impl Into<String>,
        lat: Vec<f64>,
        lon: Vec<f64>,
        times: Vec<DateTime<Utc>>,
        slices: Vec<Vec<f32>>,
    ) -> Self {
        assert_eq!(times.len(), slices.len());
        for slice in &slices {
            assert_eq!(slice.len(), lat.len() * lon.len());
        }
        Self {
            id: id.into(),
            lat,
            lon,
            times,
            slices,
        }
    }

    /// A Hawaiian-waters domain with two time samples: the older slice is
    /// all 1.0, the newer all 2.0.
    pub fn two_slices() -> Self {
        let lat = crate::axis(18.0, 0.5, 10); // 18.0 .. 22.5
        let lon = crate::axis(-162.0, 0.5, 16); // -162.0 .. -154.5
        let len = lat.len() * lon.len();
        Self::new(
            "memory-sst",
            lat,
            lon,
            vec![
                Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap(),
            ],
            vec![vec![1.0; len], vec![2.0; len]],
        )
    }

    /// Same data with the time axis stored newest-first.
    pub fn with_reversed_times(mut self) -> Self {
        self.times.reverse();
        self.slices.reverse();
        self
    }

    /// A domain with no time samples at all.
    pub fn without_times() -> Self {
        let mut ds = Self::two_slices();
        ds.times.clear();
        ds.slices.clear();
        ds
    }

    /// Same data with latitude stored north-to-south.
    pub fn with_descending_latitude(mut self) -> Self {
        let ncols = self.lon.len();
        self.lat.reverse();
        for slice in &mut self.slices {
            let rows: Vec<Vec<f32>> = slice.chunks(ncols).map(|r| r.to_vec()).collect();
            *slice = rows.into_iter().rev().flatten().collect();
        }
        self
    }

    /// Wrap a single grid as a one-sample dataset.
    pub fn from_grid(id: impl Into<String>, grid: &ScalarGrid, time: DateTime<Utc>) -> Self {
        Self::new(
            id,
            grid.lat().to_vec(),
            grid.lon().to_vec(),
            vec![time],
            vec![grid.data().to_vec()],
        )
    }
}

#[async_trait]
impl GriddedDataset for MemoryDataset {
    fn id(&self) -> &str {
        &self.id
    }

    fn latitude(&self) -> &[f64] {
        &self.lat
    }

    fn longitude(&self) -> &[f64] {
        &self.lon
    }

    fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    async fn read_window(
        &self,
        time_index: usize,
        lat: AxisWindow,
        lon: AxisWindow,
    ) -> Result<ScalarGrid, PipelineError> {
        let slice = self
            .slices
            .get(time_index)
            .ok_or_else(|| PipelineError::source("time index out of range"))?;

        let ncols = self.lon.len();
        let mut data = Vec::with_capacity(lat.len() * lon.len());
        for r in lat.start..=lat.end {
            for c in lon.start..=lon.end {
                data.push(slice[r * ncols + c]);
            }
        }

        let grid = ScalarGrid::new(
            self.lat[lat.start..=lat.end].to_vec(),
            self.lon[lon.start..=lon.end].to_vec(),
            data,
        )?;
        Ok(grid.with_valid_time(self.times[time_index]))
    }
}
