//! The main client: owns the registered locations and both caches, and
//! drives the measurement and forecast fetch cycles against a
//! [`RadiationSource`].

use crate::error::GlobalRadiationError;
use crate::freshness::{
    self, ForecastCache, ForecastPlan, ListingVerdict, MeasurementCache, MeasurementPlan,
    DEFAULT_MAX_AGE_HOURS,
};
use crate::opendata::history;
use crate::opendata::RadiationSource;
use crate::report::{self, Language};
use crate::series::measurement::CacheMode;
use crate::series::{forecast, measurement};
use crate::types::{HealthState, Location, LATITUDE_RANGE, LONGITUDE_RANGE};
use bon::bon;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

/// What one measurement fetch cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementFetchReport {
    /// Health the cycle left behind.
    pub health: HealthState,
    /// Whether the cycle answered from cache instead of decoding anew.
    pub used_cache: bool,
    /// Files downloaded and decoded in this cycle.
    pub files_processed: usize,
    /// Samples appended across all locations.
    pub values_appended: usize,
    /// Samples dropped because their timestamp was already stored.
    pub duplicates_skipped: usize,
}

/// What one forecast fetch cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastFetchReport {
    /// Health the cycle left behind.
    pub health: HealthState,
    /// Whether the cycle reused the cached dataset.
    pub used_cache: bool,
    /// Locations whose forecast was rebuilt.
    pub locations_updated: usize,
    /// Horizon entries stored across all locations.
    pub entries_retained: usize,
    /// Entries dropped for lying at or before the fetch's reference time.
    pub entries_filtered: usize,
}

/// Serializable view of the complete client state.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub locations: &'a [Location],
    pub last_measurement_fetch_date: Option<DateTime<Utc>>,
    pub last_forecast_fetch_date: Option<DateTime<Utc>>,
    pub measurement_health_state: HealthState,
    pub forecast_health_state: HealthState,
}

/// The main client for DWD global radiation data.
///
/// Holds the registered [`Location`]s, the decoded-data caches, and the
/// per-kind health states. All state lives inside this value; dropping it
/// drops every cache. Fetching takes `&mut self`, so concurrent fetches on
/// one client are ruled out at compile time and each cycle runs strictly
/// sequentially over files and locations.
///
/// # Examples
///
/// ```rust
/// # use dwd_global_radiation::{
/// #     DatasetDecoder, ForecastDataset, GlobalRadiation, GlobalRadiationError, GridDataset,
/// #     OpenDataClient,
/// # };
/// # struct NetcdfBridge;
/// # impl DatasetDecoder for NetcdfBridge {
/// #     type Error = std::io::Error;
/// #     fn decode_measurement(&self, _: &str, _: &[u8]) -> Result<GridDataset, Self::Error> {
/// #         unimplemented!()
/// #     }
/// #     fn decode_forecast(&self, _: &str, _: &[u8]) -> Result<ForecastDataset, Self::Error> {
/// #         unimplemented!()
/// #     }
/// # }
/// # async fn run() -> Result<(), GlobalRadiationError> {
/// let mut radiation = GlobalRadiation::new(OpenDataClient::new(NetcdfBridge));
/// radiation
///     .add_location()
///     .latitude(52.52)
///     .longitude(13.40)
///     .name("Berlin")
///     .call()?;
///
/// let report = radiation.fetch_measurements().call().await?;
/// println!("measurement health: {}", report.health);
/// # Ok(())
/// # }
/// ```
pub struct GlobalRadiation<S> {
    source: S,
    locations: Vec<Location>,
    measurement_cache: MeasurementCache,
    forecast_cache: ForecastCache,
    measurement_health: HealthState,
    forecast_health: HealthState,
    last_measurement_fetch: Option<DateTime<Utc>>,
    last_forecast_fetch: Option<DateTime<Utc>>,
}

#[bon]
impl<S: RadiationSource> GlobalRadiation<S> {
    /// Creates a client with no locations and empty caches, backed by the
    /// given data source.
    pub fn new(source: S) -> GlobalRadiation<S> {
        GlobalRadiation {
            source,
            locations: Vec::new(),
            measurement_cache: MeasurementCache::default(),
            forecast_cache: ForecastCache::default(),
            measurement_health: HealthState::Green,
            forecast_health: HealthState::Green,
            last_measurement_fetch: None,
            last_forecast_fetch: None,
        }
    }

    /// Registers a location to retrieve radiation data for.
    ///
    /// This method uses a builder pattern; latitude, longitude, and name are
    /// all required.
    ///
    /// # Arguments
    ///
    /// * `.latitude(f64)`: **Required.** Degrees north, inside the serviced
    ///   band 46.0 to 57.0.
    /// * `.longitude(f64)`: **Required.** Degrees east, inside the serviced
    ///   band 5.0 to 16.0.
    /// * `.name(&str)`: **Required.** A name unique among the registered
    ///   locations.
    ///
    /// # Errors
    ///
    /// Returns [`GlobalRadiationError::LatitudeOutOfRange`] or
    /// [`GlobalRadiationError::LongitudeOutOfRange`] when the point lies
    /// outside the serviced coordinate box, and
    /// [`GlobalRadiationError::DuplicateLocationName`] when the name is
    /// taken. Nothing is registered in any error case.
    #[builder]
    pub fn add_location(
        &mut self,
        latitude: f64,
        longitude: f64,
        name: &str,
    ) -> Result<(), GlobalRadiationError> {
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(GlobalRadiationError::LatitudeOutOfRange(latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(GlobalRadiationError::LongitudeOutOfRange(longitude));
        }
        if self.locations.iter().any(|l| l.name == name) {
            return Err(GlobalRadiationError::DuplicateLocationName(
                name.to_string(),
            ));
        }
        self.locations.push(Location::new(name, latitude, longitude));
        Ok(())
    }

    /// Removes a location by name.
    ///
    /// # Errors
    ///
    /// Returns [`GlobalRadiationError::LocationNotFound`] when no location
    /// carries the name; the registry is left unchanged in that case.
    pub fn remove_location(&mut self, name: &str) -> Result<(), GlobalRadiationError> {
        match self.locations.iter().position(|l| l.name == name) {
            Some(index) => {
                self.locations.remove(index);
                Ok(())
            }
            None => Err(GlobalRadiationError::LocationNotFound(name.to_string())),
        }
    }

    /// The location registered under `name`, if any.
    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.name == name)
    }

    /// All registered locations, in registration order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Health left behind by the most recent measurement cycle.
    pub fn measurement_health(&self) -> HealthState {
        self.measurement_health
    }

    /// Health left behind by the most recent forecast cycle.
    pub fn forecast_health(&self) -> HealthState {
        self.forecast_health
    }

    /// A serializable view of the client: locations with their series, last
    /// fetch times, and both health states.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            locations: &self.locations,
            last_measurement_fetch_date: self.last_measurement_fetch,
            last_forecast_fetch_date: self.last_forecast_fetch,
            measurement_health_state: self.measurement_health,
            forecast_health_state: self.forecast_health,
        }
    }

    /// Prints a human-readable report of all locations to stdout.
    pub fn print_data(&self, language: Language) {
        print!("{}", report::render(&self.locations, language));
    }

    /// Fetches measurement data for every registered location.
    ///
    /// A cycle first consults the cache: data issued less than 15 minutes
    /// ago is reused without network contact. Otherwise the remote file
    /// listing decides. An empty listing turns the health red and aborts
    /// with all prior data untouched; a listing no newer than the cache
    /// replays the cache; genuinely newer data resets every location's
    /// series plus the cache and decodes each listed file in turn.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.max_age_hours(f64)`: Optional. How far back listed files are
    ///   considered, in hours. Defaults to `3.0`. Every additional hour
    ///   means four more full-grid files to download and decode on a
    ///   refresh.
    ///
    /// # Errors
    ///
    /// Returns an error when the listing request fails at transport level,
    /// a file cannot be downloaded or decoded, or a decoded file misses its
    /// issuance timestamp. An unavailable service (empty listing) is not an
    /// error; it is reported through [`MeasurementFetchReport::health`].
    #[builder]
    pub async fn fetch_measurements(
        &mut self,
        max_age_hours: Option<f64>,
    ) -> Result<MeasurementFetchReport, GlobalRadiationError> {
        let max_age_hours = max_age_hours.unwrap_or(DEFAULT_MAX_AGE_HOURS);
        self.fetch_measurements_at(Utc::now(), max_age_hours).await
    }

    async fn fetch_measurements_at(
        &mut self,
        now: DateTime<Utc>,
        max_age_hours: f64,
    ) -> Result<MeasurementFetchReport, GlobalRadiationError> {
        self.last_measurement_fetch = Some(now);
        let mut report = MeasurementFetchReport {
            health: self.measurement_health,
            used_cache: false,
            files_processed: 0,
            values_appended: 0,
            duplicates_skipped: 0,
        };

        match freshness::measurement_plan(now, self.measurement_cache.issuance_time) {
            MeasurementPlan::UseCached => {
                info!("Using cached measurement data, it is less than 15 minutes old");
                self.replay_measurement_cache(&mut report)?;
            }
            MeasurementPlan::ConsultListing => {
                let listing = self.source.measurement_files(now, max_age_hours).await?;
                match freshness::listing_verdict(
                    now,
                    self.measurement_cache.latest_file_time,
                    &listing,
                ) {
                    ListingVerdict::Unavailable => {
                        self.measurement_health = HealthState::Red;
                        warn!("No matching measurement files found, measurement health is red");
                        report.health = self.measurement_health;
                        return Ok(report);
                    }
                    ListingVerdict::UseCached { health } => {
                        self.measurement_health = health;
                        info!("Using cached measurement data, the server offers nothing newer");
                        self.replay_measurement_cache(&mut report)?;
                    }
                    ListingVerdict::Refresh {
                        latest_file_time,
                        health,
                    } => {
                        self.measurement_health = health;
                        for location in &mut self.locations {
                            location.measurements.clear();
                        }
                        self.measurement_cache.reset();

                        for file in &listing {
                            let dataset = self.source.measurement_dataset(file).await?;
                            let issuance =
                                history::parse_measurement_issuance(&dataset.history)?;
                            if self
                                .measurement_cache
                                .issuance_time
                                .is_none_or(|cached| issuance > cached)
                            {
                                self.measurement_cache.issuance_time = Some(issuance);
                                self.measurement_cache.latest_file_time = Some(latest_file_time);
                            }
                            let outcome = measurement::apply_dataset(
                                &mut self.locations,
                                &dataset,
                                CacheMode::Fresh,
                            )?;
                            report.values_appended += outcome.appended;
                            report.duplicates_skipped += outcome.duplicates;
                            report.files_processed += 1;
                            self.measurement_cache.datasets.push(dataset);
                        }
                    }
                }
            }
        }

        report.health = self.measurement_health;
        Ok(report)
    }

    fn replay_measurement_cache(
        &mut self,
        report: &mut MeasurementFetchReport,
    ) -> Result<(), GlobalRadiationError> {
        report.used_cache = true;
        for dataset in &self.measurement_cache.datasets {
            let outcome =
                measurement::apply_dataset(&mut self.locations, dataset, CacheMode::Cached)?;
            report.values_appended += outcome.appended;
            report.duplicates_skipped += outcome.duplicates;
        }
        Ok(())
    }

    /// Fetches the forecast horizon for every registered location.
    ///
    /// A dataset issued less than an hour ago is reused from cache; the
    /// per-location forecasts are still rebuilt so the horizon stays
    /// strictly in the future. Otherwise the source is asked for the
    /// freshest obtainable file. An exhausted or empty answer turns the
    /// health red and aborts with every location's forecasts untouched; a
    /// file more than one fallback hour behind turns the health yellow.
    ///
    /// # Errors
    ///
    /// Returns an error when the pulled dataset misses its issuance
    /// timestamp. An unavailable forecast service is not an error; it is
    /// reported through [`ForecastFetchReport::health`].
    pub async fn fetch_forecasts(&mut self) -> Result<ForecastFetchReport, GlobalRadiationError> {
        self.fetch_forecasts_at(Utc::now()).await
    }

    async fn fetch_forecasts_at(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<ForecastFetchReport, GlobalRadiationError> {
        let mut report = ForecastFetchReport {
            health: self.forecast_health,
            used_cache: false,
            locations_updated: 0,
            entries_retained: 0,
            entries_filtered: 0,
        };

        let plan = freshness::forecast_plan(now, self.forecast_cache.issuance_time);
        if let (ForecastPlan::UseCached, Some(dataset), Some(issuance)) = (
            plan,
            &self.forecast_cache.dataset,
            self.forecast_cache.issuance_time,
        ) {
            info!("Using cached forecast data, it is less than 1 hour old");
            report.used_cache = true;
            let outcome = forecast::apply_dataset(&mut self.locations, dataset, issuance, now);
            report.locations_updated = outcome.locations_updated;
            report.entries_retained = outcome.retained;
            report.entries_filtered = outcome.filtered;
            report.health = self.forecast_health;
            return Ok(report);
        }

        self.last_forecast_fetch = Some(now);
        let pull = match self.source.forecast_dataset(now).await? {
            Some(pull) if !pull.dataset.is_empty() => pull,
            _ => {
                self.forecast_health = HealthState::Red;
                warn!("Forecast data is empty, forecast health is red");
                report.health = self.forecast_health;
                return Ok(report);
            }
        };

        self.forecast_health = freshness::forecast_health(pull.hours_behind);
        match self.forecast_health {
            HealthState::Yellow => warn!(
                "Forecast data is {} hours behind, forecast health is yellow",
                pull.hours_behind
            ),
            _ => info!("Forecast data is up to date"),
        }

        let issuance = history::parse_forecast_issuance(&pull.dataset.history)?;
        let dataset = pull.dataset;
        let outcome = forecast::apply_dataset(&mut self.locations, &dataset, issuance, now);
        self.forecast_cache.issuance_time = Some(issuance);
        self.forecast_cache.dataset = Some(dataset);

        report.locations_updated = outcome.locations_updated;
        report.entries_retained = outcome.retained;
        report.entries_filtered = outcome.filtered;
        report.health = self.forecast_health;
        Ok(report)
    }
}
