//! Seams between the fetch orchestration and the outside world.

use crate::grid::GridDataset;
use crate::opendata::error::OpenDataError;
use crate::opendata::forecast_data::{ForecastDataset, ForecastPull};
use crate::opendata::listing::RemoteFile;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Supplier of remote radiation data.
///
/// The shipped implementation is [`OpenDataClient`](crate::OpenDataClient);
/// tests substitute in-memory sources.
#[async_trait]
pub trait RadiationSource: Send + Sync {
    /// Measurement files currently on offer, newest first, restricted to
    /// files at most `max_age_hours` older than `now`. An empty result means
    /// the service has nothing usable right now, not an error.
    async fn measurement_files(
        &self,
        now: DateTime<Utc>,
        max_age_hours: f64,
    ) -> Result<Vec<RemoteFile>, OpenDataError>;

    /// Downloads and decodes one listed measurement file.
    async fn measurement_dataset(&self, file: &RemoteFile) -> Result<GridDataset, OpenDataError>;

    /// The freshest obtainable forecast file, or `None` when every attempt
    /// within the fallback window failed.
    async fn forecast_dataset(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<ForecastPull>, OpenDataError>;
}

/// Byte-level decoder for the NetCDF files the share serves.
///
/// Binary decoding is deliberately left outside this crate; implementors
/// bridge to whatever NetCDF reader the embedding application carries and
/// return the in-memory models defined here.
pub trait DatasetDecoder: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decodes the bytes of a measurement file (`SISin...nc`).
    fn decode_measurement(&self, name: &str, bytes: &[u8]) -> Result<GridDataset, Self::Error>;

    /// Decodes the bytes of a forecast file (`SISfc...nc`).
    fn decode_forecast(&self, name: &str, bytes: &[u8]) -> Result<ForecastDataset, Self::Error>;
}
