//! User-registered locations and the coordinate box the data service covers.

use crate::types::{Forecast, Measurement};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Latitude band covered by the DWD radiation products, degrees north.
pub const LATITUDE_RANGE: RangeInclusive<f64> = 46.0..=57.0;
/// Longitude band covered by the DWD radiation products, degrees east.
pub const LONGITUDE_RANGE: RangeInclusive<f64> = 5.0..=16.0;

/// A named point of interest together with its accumulated radiation data.
///
/// Instances are created and owned exclusively by the
/// [`GlobalRadiation`](crate::GlobalRadiation) client; the fetch cycles fill
/// in the series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// Degrees north, within [`LATITUDE_RANGE`].
    pub latitude: f64,
    /// Degrees east, within [`LONGITUDE_RANGE`].
    pub longitude: f64,
    /// Measurement series; one per grid binding, normally exactly one.
    pub measurements: Vec<Measurement>,
    /// Forecast runs; replaced wholesale by every successful forecast fetch.
    pub forecasts: Vec<Forecast>,
}

impl Location {
    pub(crate) fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            measurements: Vec::new(),
            forecasts: Vec::new(),
        }
    }
}
