use crate::grid::GridError;
use crate::opendata::OpenDataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlobalRadiationError {
    #[error(transparent)]
    OpenData(#[from] OpenDataError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("latitude must be in the range 46.0 to 57.0, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude must be in the range 5.0 to 16.0, got {0}")]
    LongitudeOutOfRange(f64),

    #[error("a location with the name '{0}' already exists")]
    DuplicateLocationName(String),

    #[error("location with name '{0}' not found")]
    LocationNotFound(String),
}
