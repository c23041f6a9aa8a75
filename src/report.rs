//! Human-readable reporting of registered locations and their data.
//!
//! [`render`] produces the text that [`GlobalRadiation::print_data`]
//! prints: a titled report listing every location with its measurement
//! series and forecast horizon as bordered tables, with all labels in the
//! chosen [`Language`] and timestamps shifted to the machine's local time.
//!
//! [`GlobalRadiation::print_data`]: crate::GlobalRadiation::print_data

use crate::types::{Forecast, ForecastMetadata, Location, Measurement};
use chrono::Local;
use std::fmt;

const INDENT: &str = "    ";
const SUB_INDENT: &str = "        ";

/// Report language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    German,
}

struct Labels {
    title: &'static str,
    location: &'static str,
    latitude: &'static str,
    longitude: &'static str,
    measurements: &'static str,
    timestamp: &'static str,
    sis: &'static str,
    grid_latitude: &'static str,
    grid_longitude: &'static str,
    distance: &'static str,
    forecasts: &'static str,
    issuance_time: &'static str,
    metadata: &'static str,
    datetime_format: &'static str,
}

const ENGLISH: Labels = Labels {
    title: "DWD Forecast and Observation Data from Selected Locations",
    location: "Location",
    latitude: "Latitude",
    longitude: "Longitude",
    measurements: "Measurements",
    timestamp: "Timestamp",
    sis: "SIS Value in W/m2",
    grid_latitude: "Grid Latitude",
    grid_longitude: "Grid Longitude",
    distance: "Distance of the location to the nearest gridpoint in km",
    forecasts: "Forecasts",
    issuance_time: "Issuance Time",
    metadata: "Metadata",
    datetime_format: "%Y-%m-%d %H:%M:%S",
};

const GERMAN: Labels = Labels {
    title: "DWD Vorhersage- und Beobachtungsdaten ausgewählter Standorte",
    location: "Ort",
    latitude: "Breitengrad",
    longitude: "Längengrad",
    measurements: "Messungen",
    timestamp: "Zeitstempel",
    sis: "SIS Wert in W/m2",
    grid_latitude: "Rasterbreitengrad",
    grid_longitude: "Rasterlängengrad",
    distance: "Entfernung der Lokation zum nächsten Gridpunkt in km",
    forecasts: "Prognosen",
    issuance_time: "Ausgabezeit",
    metadata: "Metadaten",
    datetime_format: "%d.%m.%Y %H:%M:%S",
};

impl Language {
    fn labels(self) -> &'static Labels {
        match self {
            Language::English => &ENGLISH,
            Language::German => &GERMAN,
        }
    }
}

/// Renders the full report for `locations` in the given language.
pub fn render(locations: &[Location], language: Language) -> String {
    Report {
        locations,
        language,
    }
    .to_string()
}

struct Report<'a> {
    locations: &'a [Location],
    language: Language,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.language.labels();
        let rule = "=".repeat(labels.title.chars().count());
        writeln!(f, "{rule}")?;
        writeln!(f, "{}", labels.title)?;
        writeln!(f, "{rule}")?;

        for location in self.locations {
            writeln!(f, "{}: {}", labels.location, location.name)?;
            writeln!(f, "{INDENT}{}: {}", labels.latitude, location.latitude)?;
            writeln!(f, "{INDENT}{}: {}", labels.longitude, location.longitude)?;

            if !location.measurements.is_empty() {
                writeln!(f, "{INDENT}{}:", labels.measurements)?;
                for measurement in &location.measurements {
                    write_measurement(f, labels, measurement)?;
                }
            }
            if !location.forecasts.is_empty() {
                writeln!(f, "{INDENT}{}:", labels.forecasts)?;
                for forecast in &location.forecasts {
                    write_forecast(f, labels, forecast)?;
                }
            }
        }
        Ok(())
    }
}

fn write_measurement(
    f: &mut fmt::Formatter<'_>,
    labels: &Labels,
    measurement: &Measurement,
) -> fmt::Result {
    writeln!(
        f,
        "{SUB_INDENT}{}: {}",
        labels.grid_latitude, measurement.grid_latitude
    )?;
    writeln!(
        f,
        "{SUB_INDENT}{}: {}",
        labels.grid_longitude, measurement.grid_longitude
    )?;
    writeln!(f, "{SUB_INDENT}{}: {}", labels.distance, measurement.distance_km)?;

    let rows: Vec<(String, String)> = measurement
        .entries
        .iter()
        .map(|entry| {
            (
                entry
                    .timestamp
                    .with_timezone(&Local)
                    .format(labels.datetime_format)
                    .to_string(),
                entry.sis.to_string(),
            )
        })
        .collect();
    write_table(f, labels, &rows)
}

fn write_forecast(f: &mut fmt::Formatter<'_>, labels: &Labels, forecast: &Forecast) -> fmt::Result {
    writeln!(
        f,
        "{SUB_INDENT}{}: {}",
        labels.issuance_time,
        forecast
            .issuance_time
            .with_timezone(&Local)
            .format(labels.datetime_format)
    )?;
    writeln!(
        f,
        "{SUB_INDENT}{}: {}",
        labels.grid_latitude, forecast.grid_latitude
    )?;
    writeln!(
        f,
        "{SUB_INDENT}{}: {}",
        labels.grid_longitude, forecast.grid_longitude
    )?;
    writeln!(f, "{SUB_INDENT}{}: {}", labels.distance, forecast.distance_km)?;
    writeln!(
        f,
        "{SUB_INDENT}{}: {}",
        labels.metadata,
        metadata_line(&forecast.metadata)
    )?;

    let rows: Vec<(String, String)> = forecast
        .entries
        .iter()
        .map(|entry| {
            (
                entry
                    .timestamp
                    .with_timezone(&Local)
                    .format(labels.datetime_format)
                    .to_string(),
                entry.sis.to_string(),
            )
        })
        .collect();
    write_table(f, labels, &rows)
}

fn metadata_line(metadata: &ForecastMetadata) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or("-").to_string();
    format!(
        "standard_name: {}, long_name: {}, units: {}",
        field(&metadata.standard_name),
        field(&metadata.long_name),
        field(&metadata.units)
    )
}

/// Writes a bordered two-column table, every line prefixed with the
/// sub-indent. Widths follow the widest cell per column.
fn write_table(f: &mut fmt::Formatter<'_>, labels: &Labels, rows: &[(String, String)]) -> fmt::Result {
    let time_width = rows
        .iter()
        .map(|(time, _)| time.chars().count())
        .chain([labels.timestamp.chars().count()])
        .max()
        .unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .chain([labels.sis.chars().count()])
        .max()
        .unwrap_or(0);

    let border = format!(
        "+{}+{}+",
        "-".repeat(time_width + 2),
        "-".repeat(value_width + 2)
    );
    let header_border = format!(
        "+{}+{}+",
        "=".repeat(time_width + 2),
        "=".repeat(value_width + 2)
    );

    writeln!(f, "{SUB_INDENT}{border}")?;
    writeln!(
        f,
        "{SUB_INDENT}| {:<time_width$} | {:>value_width$} |",
        labels.timestamp, labels.sis
    )?;
    writeln!(f, "{SUB_INDENT}{header_border}")?;
    for (time, value) in rows {
        writeln!(
            f,
            "{SUB_INDENT}| {time:<time_width$} | {value:>value_width$} |"
        )?;
        writeln!(f, "{SUB_INDENT}{border}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ForecastEntry, MeasurementEntry};
    use chrono::{TimeZone, Utc};

    fn berlin() -> Location {
        let mut location = Location::new("Berlin", 52.52, 13.40);
        location.measurements.push(Measurement {
            grid_latitude: 52.5,
            grid_longitude: 13.4,
            distance_km: 2.223,
            flat_index: 0,
            entries: vec![
                MeasurementEntry {
                    timestamp: Utc.with_ymd_and_hms(2024, 5, 27, 13, 45, 0).unwrap(),
                    sis: 487.0,
                },
                MeasurementEntry {
                    timestamp: Utc.with_ymd_and_hms(2024, 5, 27, 14, 0, 0).unwrap(),
                    sis: 210.5,
                },
            ],
        });
        location.forecasts.push(Forecast {
            issuance_time: Utc.with_ymd_and_hms(2024, 5, 27, 12, 0, 0).unwrap(),
            grid_latitude: 52.5,
            grid_longitude: 13.4,
            distance_km: 2.223,
            metadata: ForecastMetadata {
                standard_name: Some("surface_downwelling_shortwave_flux_in_air".to_string()),
                long_name: None,
                units: Some("W m-2".to_string()),
            },
            entries: vec![ForecastEntry {
                timestamp: Utc.with_ymd_and_hms(2024, 5, 27, 16, 0, 0).unwrap(),
                sis: 301.25,
            }],
        });
        location
    }

    #[test]
    fn german_report_uses_german_labels() {
        let report = render(&[berlin()], Language::German);

        assert!(report.contains("DWD Vorhersage- und Beobachtungsdaten ausgewählter Standorte"));
        assert!(report.contains("Ort: Berlin"));
        assert!(report.contains("    Breitengrad: 52.52"));
        assert!(report.contains("    Längengrad: 13.4"));
        assert!(report.contains("    Messungen:"));
        assert!(report.contains("        Rasterbreitengrad: 52.5"));
        assert!(report
            .contains("        Entfernung der Lokation zum nächsten Gridpunkt in km: 2.223"));
        assert!(report.contains("    Prognosen:"));
        assert!(report.contains("SIS Wert in W/m2"));
        assert!(report.contains("Zeitstempel"));
    }

    #[test]
    fn english_report_uses_english_labels() {
        let report = render(&[berlin()], Language::English);

        assert!(report.contains("DWD Forecast and Observation Data from Selected Locations"));
        assert!(report.contains("Location: Berlin"));
        assert!(report.contains("    Latitude: 52.52"));
        assert!(report.contains("    Measurements:"));
        assert!(report.contains("        Grid Latitude: 52.5"));
        assert!(report.contains("SIS Value in W/m2"));
        assert!(!report.contains("Messungen"));
    }

    #[test]
    fn title_rule_matches_title_length() {
        let report = render(&[], Language::German);
        let mut lines = report.lines();
        let rule = lines.next().unwrap();
        let title = lines.next().unwrap();

        assert!(rule.chars().all(|c| c == '='));
        assert_eq!(rule.chars().count(), title.chars().count());
        assert_eq!(lines.next().unwrap(), rule);
    }

    #[test]
    fn tables_carry_values_and_borders_at_sub_indent() {
        let report = render(&[berlin()], Language::English);

        assert!(report.contains("487"));
        assert!(report.contains("210.5"));
        assert!(report.contains("301.25"));
        for line in report.lines().filter(|l| l.trim_start().starts_with('+')) {
            assert!(line.starts_with("        +"));
            assert!(line.ends_with('+'));
        }
    }

    #[test]
    fn forecast_block_shows_issuance_and_metadata() {
        let report = render(&[berlin()], Language::English);

        assert!(report.contains("        Issuance Time: "));
        assert!(report.contains(
            "        Metadata: standard_name: surface_downwelling_shortwave_flux_in_air, \
             long_name: -, units: W m-2"
        ));
    }

    #[test]
    fn sections_without_data_are_skipped() {
        let location = Location::new("Potsdam", 52.40, 13.05);
        let report = render(&[location], Language::English);

        assert!(report.contains("Location: Potsdam"));
        assert!(!report.contains("Measurements:"));
        assert!(!report.contains("Forecasts:"));
    }
}
