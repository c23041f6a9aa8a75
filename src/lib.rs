mod error;
mod freshness;
mod geo;
mod global_radiation;
mod grid;
mod opendata;
mod report;
mod series;
mod types;

pub use error::GlobalRadiationError;
pub use global_radiation::*;

pub use freshness::DEFAULT_MAX_AGE_HOURS;
pub use grid::{nearest_grid_point, GridDataset, GridError, GridPoint, GRID_RESOLUTION_DEG};
pub use opendata::{
    DatasetDecoder, ForecastDataset, ForecastPull, NearestCell, OpenDataClient, OpenDataError,
    RadiationSource, RemoteFile, MAX_FORECAST_HOURS_BACK, SIS_BASE_URL,
};
pub use report::{render, Language};
pub use types::{
    Forecast, ForecastEntry, ForecastMetadata, HealthState, Location, Measurement,
    MeasurementEntry, LATITUDE_RANGE, LONGITUDE_RANGE,
};
