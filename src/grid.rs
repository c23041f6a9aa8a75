//! In-memory model of a decoded radiation grid file and nearest-cell
//! resolution against it.
//!
//! The DWD publishes satellite-derived global radiation ("SIS") as a regular
//! 0.05°×0.05° grid over Germany. A user location is matched to that grid in
//! two stages: the four grid corners surrounding the point are synthesized
//! from the known resolution and ranked by great-circle distance, then the
//! winning corner is located inside the dataset's real coordinate arrays.
//! This stays correct for coordinate arrays stored with floating rounding
//! error, at the cost of assuming the true resolution is exactly 0.05°.

use crate::geo::{distance_km, round_dp};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use ordered_float::OrderedFloat;
use thiserror::Error;

/// Spacing of the SIS grid in degrees, identical on both axes.
pub const GRID_RESOLUTION_DEG: f64 = 0.05;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("time units '{units}' lack a '<unit> since <base>' encoding")]
    TimeUnits { units: String },

    #[error("failed to parse the base date in time units '{units}'")]
    TimeBase {
        units: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("time index {index} outside the {len}-slice time axis")]
    TimeIndexOutOfRange { index: usize, len: usize },

    #[error("flat index {flat_index} outside the {lat_len}x{lon_len} grid")]
    CellOutOfBounds {
        flat_index: usize,
        lat_len: usize,
        lon_len: usize,
    },
}

/// A decoded measurement grid file.
///
/// Produced by a [`DatasetDecoder`](crate::DatasetDecoder) from the raw bytes
/// of one `SISin...nc` file. Only the pieces the alignment logic needs are
/// kept: the two 1-D coordinate axes, the sample values, the time axis in its
/// CF-style encoding, and the provenance string carrying the issuance
/// timestamp.
#[derive(Debug, Clone)]
pub struct GridDataset {
    /// 1-D latitude axis, degrees north.
    pub latitudes: Vec<f64>,
    /// 1-D longitude axis, degrees east.
    pub longitudes: Vec<f64>,
    /// Row-major `[time][lat][lon]` irradiance values in W/m².
    pub values: Vec<f64>,
    /// Raw time-axis offsets, interpreted as seconds past the base date.
    pub time_offsets: Vec<f64>,
    /// CF-style time encoding, e.g. `"seconds since 2024-05-27 00:00:00"`.
    pub time_units: String,
    /// Provenance attribute, e.g. `"Mon May 27 16:03:17 2024: cdo ..."`.
    pub history: String,
}

impl GridDataset {
    /// Decodes a flat cell index back into `(lat_index, lon_index)`.
    ///
    /// The serviced SIS grid is square (221×221 cells), so dividing by the
    /// latitude-axis length matches the row-major encoding used by
    /// [`nearest_grid_point`].
    pub fn cell_of(&self, flat_index: usize) -> (usize, usize) {
        let lat_len = self.latitudes.len();
        (flat_index / lat_len, flat_index % lat_len)
    }

    /// Value of one cell in one time slice, or `None` outside the grid.
    pub fn value_at(&self, time_index: usize, lat_index: usize, lon_index: usize) -> Option<f64> {
        if lat_index >= self.latitudes.len() || lon_index >= self.longitudes.len() {
            return None;
        }
        let idx = (time_index * self.latitudes.len() + lat_index) * self.longitudes.len() + lon_index;
        self.values.get(idx).copied()
    }

    /// Absolute UTC timestamp of one time slice, derived from the
    /// `"<unit> since <base>"` units string plus the slice's raw offset.
    ///
    /// The base date is taken as UTC and the offset is applied as seconds,
    /// which is how the publisher encodes the SIS files.
    pub fn slice_timestamp(&self, time_index: usize) -> Result<DateTime<Utc>, GridError> {
        let offset = self.time_offsets.get(time_index).copied().ok_or_else(|| {
            GridError::TimeIndexOutOfRange {
                index: time_index,
                len: self.time_offsets.len(),
            }
        })?;
        let (_, base) = self
            .time_units
            .split_once(" since ")
            .ok_or_else(|| GridError::TimeUnits {
                units: self.time_units.clone(),
            })?;
        let base = NaiveDateTime::parse_from_str(base.trim(), "%Y-%m-%d %H:%M:%S")
            .map_err(|source| GridError::TimeBase {
                units: self.time_units.clone(),
                source,
            })?
            .and_utc();
        Ok(base + Duration::milliseconds((offset * 1000.0).round() as i64))
    }

    /// Reads the current (first) time slice at a flat cell index, returning
    /// the slice's absolute timestamp together with the cell value.
    pub fn sample(&self, flat_index: usize) -> Result<(DateTime<Utc>, f64), GridError> {
        let (lat_index, lon_index) = self.cell_of(flat_index);
        let value =
            self.value_at(0, lat_index, lon_index)
                .ok_or_else(|| GridError::CellOutOfBounds {
                    flat_index,
                    lat_len: self.latitudes.len(),
                    lon_len: self.longitudes.len(),
                })?;
        Ok((self.slice_timestamp(0)?, value))
    }
}

/// A user location resolved onto the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Row-major cell index: `lat_index * longitude_count + lon_index`.
    pub flat_index: usize,
    /// Great-circle distance from the user point to the cell, km, 3 decimals.
    pub distance_km: f64,
    /// Cell latitude, 2 decimals.
    pub latitude: f64,
    /// Cell longitude, 2 decimals.
    pub longitude: f64,
}

/// Resolves a point to the nearest grid cell of `dataset`.
///
/// Floors the point to the 0.05° grid, ranks the four surrounding corners by
/// great-circle distance (first minimum wins), then locates the winning
/// corner in the dataset's coordinate arrays by absolute difference (again
/// first minimum wins). The coordinate arrays must be non-empty.
pub fn nearest_grid_point(latitude: f64, longitude: f64, dataset: &GridDataset) -> GridPoint {
    let lat_min = (latitude / GRID_RESOLUTION_DEG).floor() * GRID_RESOLUTION_DEG;
    let lon_min = (longitude / GRID_RESOLUTION_DEG).floor() * GRID_RESOLUTION_DEG;
    let candidates = [
        (lat_min, lon_min),
        (lat_min, lon_min + GRID_RESOLUTION_DEG),
        (lat_min + GRID_RESOLUTION_DEG, lon_min),
        (lat_min + GRID_RESOLUTION_DEG, lon_min + GRID_RESOLUTION_DEG),
    ];

    // unwrap safe: the candidate array always holds four entries.
    let ((grid_lat, grid_lon), nearest_distance) = candidates
        .into_iter()
        .map(|(clat, clon)| ((clat, clon), distance_km(latitude, longitude, clat, clon)))
        .min_by_key(|&(_, d)| OrderedFloat(d))
        .unwrap();

    let lat_index = nearest_axis_index(&dataset.latitudes, grid_lat);
    let lon_index = nearest_axis_index(&dataset.longitudes, grid_lon);

    GridPoint {
        flat_index: lat_index * dataset.longitudes.len() + lon_index,
        distance_km: round_dp(nearest_distance, 3),
        latitude: round_dp(grid_lat, 2),
        longitude: round_dp(grid_lon, 2),
    }
}

/// Index of the axis entry closest to `target`; first minimum wins.
pub(crate) fn nearest_axis_index(axis: &[f64], target: f64) -> usize {
    axis.iter()
        .enumerate()
        .min_by_key(|(_, value)| OrderedFloat((*value - target).abs()))
        .map(|(index, _)| index)
        .unwrap_or(0)
}
