//! Forecast application: wholesale horizon replacement per location.

use crate::geo::{distance_km, round_dp};
use crate::opendata::ForecastDataset;
use crate::types::{Forecast, ForecastEntry, Location};
use chrono::{DateTime, Utc};
use log::debug;

/// Counters from one forecast application cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub locations_updated: usize,
    pub retained: usize,
    pub filtered: usize,
}

/// Rebuilds every location's forecast from `dataset`.
///
/// Each location gets exactly one new [`Forecast`] built from its nearest
/// cell, carrying only entries strictly after `now`; whatever forecasts the
/// location held before are discarded. Entries at or before `now` are
/// dropped and counted, never stored.
pub fn apply_dataset(
    locations: &mut [Location],
    dataset: &ForecastDataset,
    issuance_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();
    for location in locations.iter_mut() {
        let Some(cell) = dataset.select_nearest(location.latitude, location.longitude) else {
            debug!(
                "no forecast cell selectable for '{}', coordinate axis empty",
                location.name
            );
            continue;
        };
        let grid_latitude = round_dp(cell.latitude, 2);
        let grid_longitude = round_dp(cell.longitude, 2);

        let mut entries = Vec::new();
        for (timestamp, sis) in dataset.horizon_at(cell) {
            if timestamp > now {
                entries.push(ForecastEntry { timestamp, sis });
            } else {
                outcome.filtered += 1;
            }
        }
        outcome.retained += entries.len();

        location.forecasts = vec![Forecast {
            issuance_time,
            grid_latitude,
            grid_longitude,
            distance_km: round_dp(
                distance_km(
                    grid_latitude,
                    grid_longitude,
                    location.latitude,
                    location.longitude,
                ),
                3,
            ),
            metadata: dataset.metadata.clone(),
            entries,
        }];
        outcome.locations_updated += 1;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ForecastMetadata;
    use chrono::{Duration, TimeZone};

    fn dataset_around(now: DateTime<Utc>) -> ForecastDataset {
        ForecastDataset {
            latitudes: vec![52.50, 52.55],
            longitudes: vec![13.40, 13.45],
            times: vec![now - Duration::hours(1), now + Duration::hours(1), now + Duration::hours(2)],
            values: (0..12).map(|i| i as f64 * 10.0).collect(),
            history: "model run 2024-05-27,12:25".to_string(),
            metadata: ForecastMetadata {
                standard_name: Some("surface_downwelling_shortwave_flux_in_air".to_string()),
                long_name: Some("Surface Downwelling Shortwave Radiation".to_string()),
                units: Some("W m-2".to_string()),
            },
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 27, 13, 0, 0).unwrap()
    }

    #[test]
    fn only_future_entries_survive() {
        let mut locations = vec![Location::new("Berlin", 52.52, 13.40)];
        let outcome = apply_dataset(&mut locations, &dataset_around(now()), now(), now());

        assert_eq!(outcome.locations_updated, 1);
        assert_eq!(outcome.retained, 2);
        assert_eq!(outcome.filtered, 1);

        let forecast = &locations[0].forecasts[0];
        assert_eq!(forecast.entries.len(), 2);
        assert!(forecast.entries.iter().all(|e| e.timestamp > now()));
    }

    #[test]
    fn previous_forecasts_are_replaced_wholesale() {
        let mut locations = vec![Location::new("Berlin", 52.52, 13.40)];

        apply_dataset(&mut locations, &dataset_around(now()), now(), now());
        let later = now() + Duration::hours(2);
        apply_dataset(
            &mut locations,
            &dataset_around(later),
            later,
            later,
        );

        let forecasts = &locations[0].forecasts;
        assert_eq!(forecasts.len(), 1);
        assert_eq!(forecasts[0].issuance_time, later);
    }

    #[test]
    fn grid_binding_and_metadata_come_from_the_dataset() {
        let mut locations = vec![Location::new("Berlin", 52.52, 13.41)];
        apply_dataset(&mut locations, &dataset_around(now()), now(), now());

        let forecast = &locations[0].forecasts[0];
        assert_eq!(forecast.grid_latitude, 52.5);
        assert_eq!(forecast.grid_longitude, 13.4);
        assert!(forecast.distance_km > 0.0);
        assert_eq!(forecast.metadata.units.as_deref(), Some("W m-2"));
    }
}
