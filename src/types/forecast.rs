//! Per-location forecast horizon, replaced wholesale by every fetch cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One forecast sample on the hourly horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Validity time of the forecast value (UTC).
    pub timestamp: DateTime<Utc>,
    /// Forecast surface incoming shortwave irradiance in W/m².
    pub sis: f64,
}

/// Attributes of the radiation variable, copied from the source file.
///
/// All three are set together from whatever the file carries; a file without
/// attributes yields three `None`s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetadata {
    pub standard_name: Option<String>,
    pub long_name: Option<String>,
    pub units: Option<String>,
}

/// One forecast run for one location.
///
/// Unlike the measurement series, a forecast is never appended to: each
/// successful fetch cycle builds a new record from the freshest model run and
/// replaces the previous one entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// Model run time parsed from the file's provenance string (UTC).
    pub issuance_time: DateTime<Utc>,
    /// Latitude of the selected grid cell, rounded to 2 decimals.
    pub grid_latitude: f64,
    /// Longitude of the selected grid cell, rounded to 2 decimals.
    pub grid_longitude: f64,
    /// Great-circle distance from the location to the cell in km, 3 decimals.
    pub distance_km: f64,
    pub metadata: ForecastMetadata,
    /// Entries strictly after the fetch's reference time, insertion-ordered.
    pub entries: Vec<ForecastEntry>,
}
