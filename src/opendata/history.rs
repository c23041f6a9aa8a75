//! Issuance timestamps hidden in the files' history attributes.
//!
//! Both product families carry their processing time only inside the
//! free-text `history` attribute, each in its own format: forecast files as
//! `2024-05-27,12:25`, measurement files as a ctime-style
//! `Mon May 27 16:03:17 2024` prefix written by the cdo processing chain.
//! Both stamps are UTC.

use crate::opendata::error::OpenDataError;
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

// patterns are checked literals
static FORECAST_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2},\d{2}:\d{2}").unwrap());
static MEASUREMENT_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w{3}\s\d{2}\s\d{2}:\d{2}:\d{2}\s\d{4}\b").unwrap());

/// Model-run time of a forecast file.
pub fn parse_forecast_issuance(history: &str) -> Result<DateTime<Utc>, OpenDataError> {
    parse_stamp(history, &FORECAST_STAMP, "%Y-%m-%d,%H:%M")
}

/// Processing time of a measurement file.
pub fn parse_measurement_issuance(history: &str) -> Result<DateTime<Utc>, OpenDataError> {
    parse_stamp(history, &MEASUREMENT_STAMP, "%b %d %H:%M:%S %Y")
}

fn parse_stamp(
    history: &str,
    pattern: &Regex,
    format: &str,
) -> Result<DateTime<Utc>, OpenDataError> {
    let raw = pattern
        .find(history)
        .ok_or_else(|| OpenDataError::IssuanceNotFound(history.to_string()))?
        .as_str();
    let parsed =
        NaiveDateTime::parse_from_str(raw, format).map_err(|source| OpenDataError::IssuanceFormat {
            raw: raw.to_string(),
            source,
        })?;
    Ok(parsed.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn forecast_stamp_is_found_inside_longer_text() {
        let history = "regridded with MFG/MSG processing, model run 2024-05-27,12:25 over DE";
        let issued = parse_forecast_issuance(history).unwrap();
        assert_eq!(issued, Utc.with_ymd_and_hms(2024, 5, 27, 12, 25, 0).unwrap());
    }

    #[test]
    fn measurement_stamp_skips_the_weekday() {
        let history = "Mon May 27 16:03:17 2024: cdo -selvar,SIS -sellonlatbox,5,16,46,57 in.nc out.nc";
        let issued = parse_measurement_issuance(history).unwrap();
        assert_eq!(issued, Utc.with_ymd_and_hms(2024, 5, 27, 16, 3, 17).unwrap());
    }

    #[test]
    fn missing_stamp_is_an_error() {
        assert!(matches!(
            parse_forecast_issuance("no timestamp here"),
            Err(OpenDataError::IssuanceNotFound(_))
        ));
        assert!(matches!(
            parse_measurement_issuance("cdo -selvar,SIS"),
            Err(OpenDataError::IssuanceNotFound(_))
        ));
    }

    #[test]
    fn shape_matching_garbage_is_a_format_error() {
        assert!(matches!(
            parse_forecast_issuance("made at 2024-99-99,99:99"),
            Err(OpenDataError::IssuanceFormat { .. })
        ));
        assert!(matches!(
            parse_measurement_issuance("Xyz 47 25:71:90 2024 cdo"),
            Err(OpenDataError::IssuanceFormat { .. })
        ));
    }
}
