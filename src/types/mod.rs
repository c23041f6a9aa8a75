pub mod forecast;
pub mod health;
pub mod location;
pub mod measurement;

pub use forecast::{Forecast, ForecastEntry, ForecastMetadata};
pub use health::HealthState;
pub use location::{Location, LATITUDE_RANGE, LONGITUDE_RANGE};
pub use measurement::{Measurement, MeasurementEntry};
