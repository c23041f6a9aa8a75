//! Measurement application: grid binding plus append-only series growth.

use crate::grid::{nearest_grid_point, GridDataset, GridError};
use crate::types::{Location, Measurement};

/// Whether a cycle works on freshly decoded data or replays the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Fresh,
    Cached,
}

/// Counters from applying one dataset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub appended: usize,
    pub duplicates: usize,
}

/// Applies one decoded grid to every location.
///
/// A location without a series first gets its grid cell resolved and a fresh
/// series bound to it; afterwards the cell's current sample is appended,
/// with exact-timestamp duplicates dropped by the series itself. In `Cached`
/// mode, locations that already carry a series are left untouched, so a
/// cache replay only ever fills in locations registered since the data was
/// fetched.
pub fn apply_dataset(
    locations: &mut [Location],
    dataset: &GridDataset,
    mode: CacheMode,
) -> Result<ApplyOutcome, GridError> {
    let mut outcome = ApplyOutcome::default();
    for location in locations.iter_mut() {
        if mode == CacheMode::Cached && !location.measurements.is_empty() {
            continue;
        }
        if location.measurements.is_empty() {
            let point = nearest_grid_point(location.latitude, location.longitude, dataset);
            location.measurements.push(Measurement::at_grid_point(point));
        }
        let Some(series) = location.measurements.first_mut() else {
            continue;
        };
        let (timestamp, value) = dataset.sample(series.flat_index)?;
        if series.push_entry(timestamp, value) {
            outcome.appended += 1;
        } else {
            outcome.duplicates += 1;
        }
    }
    Ok(outcome)
}
