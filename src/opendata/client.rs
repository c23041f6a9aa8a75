//! The reqwest-backed supplier of DWD OpenData radiation files.

use crate::grid::GridDataset;
use crate::opendata::error::OpenDataError;
use crate::opendata::forecast_data::{ForecastDataset, ForecastPull};
use crate::opendata::listing::{parse_listing, RemoteFile};
use crate::opendata::source::{DatasetDecoder, RadiationSource};
use crate::opendata::urls;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::Client;

/// How many successively older start hours the forecast loader tries before
/// giving up.
pub const MAX_FORECAST_HOURS_BACK: u32 = 10;

/// OpenData access over HTTP, generic over the byte-level NetCDF decoder.
pub struct OpenDataClient<D> {
    http: Client,
    decoder: D,
}

impl<D> OpenDataClient<D> {
    pub fn new(decoder: D) -> OpenDataClient<D> {
        OpenDataClient {
            http: Client::new(),
            decoder,
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, OpenDataError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| OpenDataError::Download(url.to_string(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(OpenDataError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| OpenDataError::Download(url.to_string(), e))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl<D: DatasetDecoder> RadiationSource for OpenDataClient<D> {
    /// Scrapes the SIS directory index. A reachable server answering with a
    /// non-success status is reported as an empty listing; only transport
    /// failures surface as errors.
    async fn measurement_files(
        &self,
        now: DateTime<Utc>,
        max_age_hours: f64,
    ) -> Result<Vec<RemoteFile>, OpenDataError> {
        let url = urls::SIS_BASE_URL;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| OpenDataError::ListingRequest(url.to_string(), e))?;
        let status = response.status();
        if !status.is_success() {
            warn!("Listing request for {url} answered with status {status}");
            return Ok(Vec::new());
        }
        let body = response
            .text()
            .await
            .map_err(|e| OpenDataError::ListingRequest(url.to_string(), e))?;
        let files = parse_listing(&body, now, max_age_hours);
        info!(
            "Found {} measurement files within the {max_age_hours} h window",
            files.len()
        );
        Ok(files)
    }

    async fn measurement_dataset(&self, file: &RemoteFile) -> Result<GridDataset, OpenDataError> {
        let url = urls::measurement_file_url(&file.name);
        info!("Downloading measurement file {url}");
        let bytes = self.download(&url).await?;
        self.decoder
            .decode_measurement(&file.name, &bytes)
            .map_err(|e| OpenDataError::Decode {
                name: file.name.clone(),
                source: Box::new(e),
            })
    }

    /// Tries the forecast file for the current start hour first, then walks
    /// back hour by hour. Failed attempts are logged and swallowed; only a
    /// fully exhausted window yields `None`.
    async fn forecast_dataset(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<ForecastPull>, OpenDataError> {
        for hours_back in 0..MAX_FORECAST_HOURS_BACK {
            let url = urls::forecast_url(hours_back, now);
            match self.try_forecast(&url).await {
                Ok(dataset) => {
                    if hours_back > 0 {
                        info!("Forecast fell back {hours_back} h to {url}");
                    }
                    return Ok(Some(ForecastPull {
                        dataset,
                        hours_behind: hours_back,
                    }));
                }
                Err(error) => debug!("Forecast attempt at {url} failed: {error}"),
            }
        }
        warn!("No forecast file obtainable within {MAX_FORECAST_HOURS_BACK} start hours");
        Ok(None)
    }
}

impl<D: DatasetDecoder> OpenDataClient<D> {
    async fn try_forecast(&self, url: &str) -> Result<ForecastDataset, OpenDataError> {
        let bytes = self.download(url).await?;
        let name = url.rsplit('/').next().unwrap_or(url);
        self.decoder
            .decode_forecast(name, &bytes)
            .map_err(|e| OpenDataError::Decode {
                name: name.to_string(),
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct NoDecode;

    impl fmt::Display for NoDecode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("decoding disabled in this test")
        }
    }

    impl std::error::Error for NoDecode {}

    struct ListingOnlyDecoder;

    impl DatasetDecoder for ListingOnlyDecoder {
        type Error = NoDecode;

        fn decode_measurement(&self, _: &str, _: &[u8]) -> Result<GridDataset, NoDecode> {
            Err(NoDecode)
        }

        fn decode_forecast(&self, _: &str, _: &[u8]) -> Result<ForecastDataset, NoDecode> {
            Err(NoDecode)
        }
    }

    #[tokio::test]
    #[ignore = "hits the live DWD OpenData share"]
    async fn live_listing_offers_recent_files() {
        let client = OpenDataClient::new(ListingOnlyDecoder);
        let files = client
            .measurement_files(Utc::now(), 3.0)
            .await
            .expect("listing request");

        assert!(!files.is_empty());
        assert!(files.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }
}
