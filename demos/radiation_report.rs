//! Offline tour of the crate: registers the locations listed in
//! `demos/locations.toml`, runs one measurement and one forecast cycle
//! against a synthetic data source, and prints the German report followed
//! by the JSON snapshot.
//!
//! Run with `RUST_LOG=info cargo run --example radiation_report` to see the
//! fetch cycle logging.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Timelike, Utc};
use dwd_global_radiation::{
    ForecastDataset, ForecastMetadata, ForecastPull, GlobalRadiation, GridDataset, Language,
    OpenDataError, RadiationSource, RemoteFile,
};
use serde::Deserialize;
use std::f64::consts::PI;

#[derive(Deserialize)]
struct LocationFile {
    locations: Vec<LocationEntry>,
}

#[derive(Deserialize)]
struct LocationEntry {
    name: String,
    latitude: f64,
    longitude: f64,
}

/// A stand-in for the DWD OpenData share that invents plausible radiation
/// values around Berlin, so the demo runs without network access.
struct SyntheticSky;

fn axis(start: f64, points: usize) -> Vec<f64> {
    (0..points).map(|i| start + i as f64 * 0.05).collect()
}

/// A rough clear-sky diurnal curve in W/m².
fn clear_sky_sis(at: DateTime<Utc>) -> f64 {
    let hour = at.hour() as f64 + at.minute() as f64 / 60.0;
    (800.0 * ((hour - 6.0) * PI / 12.0).sin()).max(0.0)
}

fn last_quarter_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let minute = now.minute() - now.minute() % 15;
    now.with_minute(minute)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

#[async_trait]
impl RadiationSource for SyntheticSky {
    async fn measurement_files(
        &self,
        now: DateTime<Utc>,
        _max_age_hours: f64,
    ) -> Result<Vec<RemoteFile>, OpenDataError> {
        let slot = last_quarter_hour(now);
        Ok(vec![RemoteFile {
            name: format!("SISin{}DEv3.nc", slot.format("%Y%m%d%H%M")),
            timestamp: slot,
        }])
    }

    async fn measurement_dataset(
        &self,
        file: &RemoteFile,
    ) -> Result<GridDataset, OpenDataError> {
        let latitudes = axis(52.0, 13);
        let longitudes = axis(13.0, 13);
        let sis = clear_sky_sis(file.timestamp);
        let values = (0..latitudes.len() * longitudes.len())
            .map(|i| sis + (i % 7) as f64)
            .collect();

        let midnight = file
            .timestamp
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();
        Ok(GridDataset {
            latitudes,
            longitudes,
            values,
            time_offsets: vec![(file.timestamp - midnight).num_seconds() as f64],
            time_units: format!("seconds since {}", midnight.format("%Y-%m-%d %H:%M:%S")),
            history: format!(
                "{}: cdo selname,SIS raw.nc {}",
                file.timestamp.format("%a %b %d %H:%M:%S %Y"),
                file.name
            ),
        })
    }

    async fn forecast_dataset(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<ForecastPull>, OpenDataError> {
        let latitudes = axis(52.0, 13);
        let longitudes = axis(13.0, 13);
        let run = last_quarter_hour(now) - Duration::minutes(30);
        let times: Vec<DateTime<Utc>> = (1..=18)
            .map(|h| run + Duration::hours(h))
            .collect();
        let cells = latitudes.len() * longitudes.len();
        let mut values = Vec::with_capacity(times.len() * cells);
        for time in &times {
            let sis = clear_sky_sis(*time);
            values.extend((0..cells).map(|i| sis + (i % 5) as f64));
        }

        Ok(Some(ForecastPull {
            dataset: ForecastDataset {
                latitudes,
                longitudes,
                times,
                values,
                history: format!("model run {}", run.format("%Y-%m-%d,%H:%M")),
                metadata: ForecastMetadata {
                    standard_name: Some(
                        "surface_downwelling_shortwave_flux_in_air".to_string(),
                    ),
                    long_name: Some("Solar Irradiance".to_string()),
                    units: Some("W m-2".to_string()),
                },
            },
            hours_behind: 0,
        }))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let raw = std::fs::read_to_string("demos/locations.toml")?;
    let parsed: LocationFile = toml::from_str(&raw)?;

    let mut radiation = GlobalRadiation::new(SyntheticSky);
    for entry in &parsed.locations {
        radiation
            .add_location()
            .latitude(entry.latitude)
            .longitude(entry.longitude)
            .name(&entry.name)
            .call()?;
    }

    let measurements = radiation.fetch_measurements().call().await?;
    println!(
        "measurement cycle: health {}, {} file(s), {} value(s) appended",
        measurements.health, measurements.files_processed, measurements.values_appended
    );
    let forecasts = radiation.fetch_forecasts().await?;
    println!(
        "forecast cycle: health {}, {} location(s) updated, {} entries\n",
        forecasts.health, forecasts.locations_updated, forecasts.entries_retained
    );

    radiation.print_data(Language::German);
    println!("{}", serde_json::to_string_pretty(&radiation.snapshot())?);
    Ok(())
}
