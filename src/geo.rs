//! Great-circle geometry shared by the grid resolver and the forecast builder.

use haversine::{distance, Location as HaversineLocation, Units};

/// Great-circle distance in kilometers between two points given in decimal
/// degrees, via the haversine formula (mean Earth radius 6371.0 km).
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance(
        HaversineLocation {
            latitude: lat1,
            longitude: lon1,
        },
        HaversineLocation {
            latitude: lat2,
            longitude: lon2,
        },
        Units::Kilometers,
    )
}

/// Rounds to `decimals` decimal places. Grid coordinates are reported with
/// two decimals, distances with three.
pub(crate) fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        assert_eq!(distance_km(52.52, 13.40, 52.52, 13.40), 0.0);
        assert_eq!(distance_km(46.0, 5.0, 46.0, 5.0), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = distance_km(48.8566, 2.3522, 34.0522, -118.2437);
        let b = distance_km(34.0522, -118.2437, 48.8566, 2.3522);
        assert_eq!(a, b);
    }

    #[test]
    fn paris_to_los_angeles() {
        // Reference value for R = 6371.0 km.
        let d = distance_km(48.8566, 2.3522, 34.0522, -118.2437);
        assert!((d - 9085.5088).abs() < 0.01, "got {d}");
    }

    #[test]
    fn rounding() {
        assert_eq!(round_dp(13.40123, 2), 13.4);
        assert_eq!(round_dp(2.2246789, 3), 2.225);
        assert_eq!(round_dp(52.549999, 2), 52.55);
    }
}
