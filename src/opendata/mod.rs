//! Access to the DWD OpenData radiation share: directory-index scraping,
//! file addressing, issuance-timestamp extraction, and the seam traits the
//! fetch orchestration talks through.

pub mod client;
pub mod error;
pub mod forecast_data;
pub mod history;
pub mod listing;
pub mod source;
pub mod urls;

pub use client::{OpenDataClient, MAX_FORECAST_HOURS_BACK};
pub use error::OpenDataError;
pub use forecast_data::{ForecastDataset, ForecastPull, NearestCell};
pub use listing::RemoteFile;
pub use source::{DatasetDecoder, RadiationSource};
pub use urls::SIS_BASE_URL;
