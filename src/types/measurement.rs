//! Per-location measurement series, pinned to one cell of the radiation grid.

use crate::grid::GridPoint;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// One observed global-radiation sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementEntry {
    /// Validity time of the sample (UTC).
    pub timestamp: DateTime<Utc>,
    /// Surface incoming shortwave irradiance in W/m².
    pub sis: f64,
}

/// The accumulated measurement series of one location.
///
/// The grid binding (cell coordinates, flat index, distance) is resolved once
/// when the first sample arrives and reused for every later append; only the
/// entry list grows afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Latitude of the bound grid cell, rounded to 2 decimals.
    pub grid_latitude: f64,
    /// Longitude of the bound grid cell, rounded to 2 decimals.
    pub grid_longitude: f64,
    /// Great-circle distance from the location to the cell in km, 3 decimals.
    pub distance_km: f64,
    /// Row-major cell index in the source grid.
    pub flat_index: usize,
    /// Samples in insertion order, unique by timestamp.
    pub entries: Vec<MeasurementEntry>,
}

impl Measurement {
    /// Starts an empty series bound to a resolved grid cell.
    pub fn at_grid_point(point: GridPoint) -> Self {
        Self {
            grid_latitude: point.latitude,
            grid_longitude: point.longitude,
            distance_km: point.distance_km,
            flat_index: point.flat_index,
            entries: Vec::new(),
        }
    }

    /// Appends a sample unless an entry with the same timestamp is already
    /// stored. Returns whether the sample was appended; duplicates are kept
    /// out (first value wins) and logged at debug level.
    pub fn push_entry(&mut self, timestamp: DateTime<Utc>, sis: f64) -> bool {
        if self
            .entries
            .iter()
            .any(|entry| entry.timestamp == timestamp)
        {
            debug!("duplicate timestamp {timestamp}, measurement value not added");
            return false;
        }
        self.entries.push(MeasurementEntry { timestamp, sis });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bound_series() -> Measurement {
        Measurement::at_grid_point(GridPoint {
            flat_index: 42,
            distance_km: 1.234,
            latitude: 52.5,
            longitude: 13.4,
        })
    }

    #[test]
    fn duplicate_timestamp_keeps_first_value() {
        let mut series = bound_series();
        let at = Utc.with_ymd_and_hms(2024, 5, 27, 13, 45, 0).unwrap();

        assert!(series.push_entry(at, 100.0));
        assert!(!series.push_entry(at, 999.0));

        assert_eq!(series.entries.len(), 1);
        assert_eq!(series.entries[0].sis, 100.0);
    }

    #[test]
    fn distinct_timestamps_append_in_order() {
        let mut series = bound_series();
        let base = Utc.with_ymd_and_hms(2024, 5, 27, 13, 0, 0).unwrap();

        for quarter in 0..4 {
            let at = base + chrono::Duration::minutes(15 * quarter);
            assert!(series.push_entry(at, quarter as f64));
        }

        assert_eq!(series.entries.len(), 4);
        let stored: Vec<f64> = series.entries.iter().map(|e| e.sis).collect();
        assert_eq!(stored, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
