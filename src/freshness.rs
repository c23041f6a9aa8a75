//! Cache records and the fetch-or-reuse decisions behind both fetch cycles.
//!
//! The publisher refreshes measurements every quarter hour and forecasts
//! every hour, so a fetch that completed inside the current publication
//! cycle can answer from cache without touching the network. Past that
//! window the remote listing gets the final say for measurements, since the
//! share occasionally lags its own cadence.

use crate::grid::GridDataset;
use crate::opendata::{ForecastDataset, RemoteFile};
use crate::types::HealthState;
use chrono::{DateTime, Duration, Utc};

/// Minutes a finished measurement fetch keeps answering from cache.
pub const MEASUREMENT_REUSE_MINUTES: i64 = 15;
/// Hours a fetched forecast dataset keeps answering from cache.
pub const FORECAST_REUSE_HOURS: i64 = 1;
/// Hours after which the newest remote data counts as stale.
pub const STALENESS_THRESHOLD_HOURS: i64 = 1;
/// Default bound on how far back listed measurement files are considered.
pub const DEFAULT_MAX_AGE_HOURS: f64 = 3.0;

/// Decoded measurement files retained for cached-reuse cycles.
#[derive(Debug, Default)]
pub struct MeasurementCache {
    /// Newest issuance timestamp seen across the decoded files.
    pub issuance_time: Option<DateTime<Utc>>,
    /// Validity time of the newest remote file at the last refresh.
    pub latest_file_time: Option<DateTime<Utc>>,
    /// The decoded datasets themselves, in download order.
    pub datasets: Vec<GridDataset>,
}

impl MeasurementCache {
    pub fn reset(&mut self) {
        *self = MeasurementCache::default();
    }
}

/// The forecast dataset retained for cached-reuse cycles.
#[derive(Debug, Default)]
pub struct ForecastCache {
    /// Model-run time parsed from the cached dataset's history attribute.
    pub issuance_time: Option<DateTime<Utc>>,
    pub dataset: Option<ForecastDataset>,
}

impl ForecastCache {
    pub fn reset(&mut self) {
        *self = ForecastCache::default();
    }
}

/// First-stage measurement decision, taken before any network contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementPlan {
    /// The cached issuance is younger than the reuse window.
    UseCached,
    /// Stale or absent cache; the remote listing decides what happens.
    ConsultListing,
}

pub fn measurement_plan(
    now: DateTime<Utc>,
    cached_issuance: Option<DateTime<Utc>>,
) -> MeasurementPlan {
    match cached_issuance {
        Some(issued) if now - issued < Duration::minutes(MEASUREMENT_REUSE_MINUTES) => {
            MeasurementPlan::UseCached
        }
        _ => MeasurementPlan::ConsultListing,
    }
}

/// Second-stage measurement decision, derived from the remote listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingVerdict {
    /// Nothing matched the age window; the cycle aborts red with the prior
    /// cache untouched.
    Unavailable,
    /// The cache already covers the newest remote file.
    UseCached { health: HealthState },
    /// Strictly newer remote data; reset everything and decode the listing.
    Refresh {
        latest_file_time: DateTime<Utc>,
        health: HealthState,
    },
}

pub fn listing_verdict(
    now: DateTime<Utc>,
    cached_latest_file_time: Option<DateTime<Utc>>,
    listing: &[RemoteFile],
) -> ListingVerdict {
    let Some(latest) = listing.iter().map(|file| file.timestamp).max() else {
        return ListingVerdict::Unavailable;
    };
    let health = if now - latest > Duration::hours(STALENESS_THRESHOLD_HOURS) {
        HealthState::Yellow
    } else {
        HealthState::Green
    };
    match cached_latest_file_time {
        Some(cached) if cached >= latest => ListingVerdict::UseCached { health },
        _ => ListingVerdict::Refresh {
            latest_file_time: latest,
            health,
        },
    }
}

/// Forecast decision; there is no listing stage, only the reuse window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastPlan {
    UseCached,
    FetchRequired,
}

pub fn forecast_plan(now: DateTime<Utc>, cached_issuance: Option<DateTime<Utc>>) -> ForecastPlan {
    match cached_issuance {
        Some(issued) if now - issued < Duration::hours(FORECAST_REUSE_HOURS) => {
            ForecastPlan::UseCached
        }
        _ => ForecastPlan::FetchRequired,
    }
}

/// Health of a freshly pulled forecast given how many fallback hours the
/// loader needed.
pub fn forecast_health(hours_behind: u32) -> HealthState {
    if hours_behind > 1 {
        HealthState::Yellow
    } else {
        HealthState::Green
    }
}
