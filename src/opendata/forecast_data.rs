//! In-memory model of a decoded 18-hour forecast file.

use crate::grid::nearest_axis_index;
use crate::types::ForecastMetadata;
use chrono::{DateTime, Utc};

/// A decoded forecast grid.
///
/// Unlike the measurement grid, the forecast grid carries its time axis as
/// absolute timestamps and is queried by plain per-axis nearest selection
/// rather than 4-corner resolution, because its cell layout differs from the
/// measurement product.
#[derive(Debug, Clone)]
pub struct ForecastDataset {
    /// 1-D latitude axis, degrees north.
    pub latitudes: Vec<f64>,
    /// 1-D longitude axis, degrees east.
    pub longitudes: Vec<f64>,
    /// Validity times of the horizon (UTC).
    pub times: Vec<DateTime<Utc>>,
    /// Row-major `[time][lat][lon]` forecast values in W/m².
    pub values: Vec<f64>,
    /// Provenance attribute carrying the model-run timestamp.
    pub history: String,
    /// Attributes of the radiation variable, if the file carries them.
    pub metadata: ForecastMetadata,
}

/// One grid cell picked out of a forecast dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestCell {
    pub lat_index: usize,
    pub lon_index: usize,
    /// Cell coordinates as stored on the axes, unrounded.
    pub latitude: f64,
    pub longitude: f64,
}

impl ForecastDataset {
    /// True when every dimension has zero length.
    pub fn is_empty(&self) -> bool {
        self.latitudes.is_empty() && self.longitudes.is_empty() && self.times.is_empty()
    }

    /// Nearest cell by independent absolute-difference selection on each
    /// coordinate axis. `None` when a coordinate axis is empty.
    pub fn select_nearest(&self, latitude: f64, longitude: f64) -> Option<NearestCell> {
        let lat_index = nearest_axis_index(&self.latitudes, latitude);
        let lon_index = nearest_axis_index(&self.longitudes, longitude);
        Some(NearestCell {
            lat_index,
            lon_index,
            latitude: self.latitudes.get(lat_index).copied()?,
            longitude: self.longitudes.get(lon_index).copied()?,
        })
    }

    /// Forecast value of one time slice at a cell.
    pub fn value_at(&self, time_index: usize, cell: NearestCell) -> Option<f64> {
        if cell.lat_index >= self.latitudes.len() || cell.lon_index >= self.longitudes.len() {
            return None;
        }
        let idx = (time_index * self.latitudes.len() + cell.lat_index) * self.longitudes.len()
            + cell.lon_index;
        self.values.get(idx).copied()
    }

    /// The full horizon at a cell as (validity time, value) pairs.
    pub fn horizon_at(&self, cell: NearestCell) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.times
            .iter()
            .enumerate()
            .filter_map(move |(index, &time)| Some((time, self.value_at(index, cell)?)))
    }
}

/// A successfully downloaded and decoded forecast file.
#[derive(Debug, Clone)]
pub struct ForecastPull {
    pub dataset: ForecastDataset,
    /// How many whole hours older than the freshest possible start hour the
    /// file is.
    pub hours_behind: u32,
}
