//! URL construction for the DWD OpenData radiation share.
//!
//! Measurement files live flat under the SIS directory and are addressed by
//! the names taken from the directory index. Forecast files are addressed by
//! start hour; a file for hour H only appears on the share around H:15, so a
//! request made earlier in the hour has to fall back to the previous hour's
//! file. That rollback, applied after going back `hours_back` whole hours, is
//! plain date arithmetic here.

use chrono::{DateTime, Duration, Timelike, Utc};

/// Directory holding the quarter-hourly SIS measurement files.
pub const SIS_BASE_URL: &str = "https://opendata.dwd.de/weather/satellite/radiation/sis/";

/// Minute of the hour from which the current hour's forecast file is
/// expected to be published.
pub const HOURLY_PUBLICATION_MINUTE: u32 = 15;

/// Download URL of a listed measurement file.
pub fn measurement_file_url(name: &str) -> String {
    format!("{SIS_BASE_URL}{name}")
}

/// URL of the 18-hour forecast file whose start hour lies `hours_back` whole
/// hours before `now`, shifted one more hour back when the target hour's file
/// cannot have been published yet.
///
/// The file name carries a literal `+` which the share serves percent-encoded.
pub fn forecast_url(hours_back: u32, now: DateTime<Utc>) -> String {
    let mut target = now - Duration::hours(i64::from(hours_back));
    if target.minute() < HOURLY_PUBLICATION_MINUTE {
        target -= Duration::hours(1);
    }
    format!("{SIS_BASE_URL}SISfc{}_fc%2B18h-DE.nc", target.format("%Y%m%d%H"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn late_minute_keeps_the_current_hour() {
        let now = Utc.with_ymd_and_hms(2024, 5, 27, 13, 45, 0).unwrap();
        assert_eq!(
            forecast_url(0, now),
            "https://opendata.dwd.de/weather/satellite/radiation/sis/SISfc2024052713_fc%2B18h-DE.nc"
        );
    }

    #[test]
    fn early_minute_falls_back_an_hour() {
        let now = Utc.with_ymd_and_hms(2024, 5, 27, 13, 10, 0).unwrap();
        assert!(forecast_url(0, now).contains("SISfc2024052712"));
    }

    #[test]
    fn rollback_crosses_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 5, 27, 0, 5, 0).unwrap();
        assert!(forecast_url(0, now).contains("SISfc2024052623"));
    }

    #[test]
    fn rollback_crosses_month_and_year() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 3, 0).unwrap();
        assert!(forecast_url(0, now).contains("SISfc2024022923"));

        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 14, 0).unwrap();
        assert!(forecast_url(0, now).contains("SISfc2024123123"));
    }

    #[test]
    fn hours_back_shift_applies_before_the_minute_rule() {
        let now = Utc.with_ymd_and_hms(2024, 5, 27, 13, 45, 0).unwrap();
        assert!(forecast_url(3, now).contains("SISfc2024052710"));

        // 10:45 minus the publication rule stays at 10, minus 11 hours lands
        // the previous day.
        let now = Utc.with_ymd_and_hms(2024, 5, 27, 10, 5, 0).unwrap();
        assert!(forecast_url(11, now).contains("SISfc2024052622"));
    }

    #[test]
    fn measurement_url_joins_base_and_name() {
        assert_eq!(
            measurement_file_url("SISin202405271345DEv3.nc"),
            "https://opendata.dwd.de/weather/satellite/radiation/sis/SISin202405271345DEv3.nc"
        );
    }
}
