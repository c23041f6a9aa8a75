use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenDataError {
    #[error("Listing request failed for {0}")]
    ListingRequest(String, #[source] reqwest::Error),

    #[error("Download failed for {0}")]
    Download(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Decoding '{name}' failed")]
    Decode {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No issuance timestamp found in history attribute '{0}'")]
    IssuanceNotFound(String),

    #[error("Unparseable issuance timestamp '{raw}'")]
    IssuanceFormat {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}
