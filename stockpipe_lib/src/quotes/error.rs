//! Error types for market-data provider operations.

use thiserror::Error;

/// Errors from fetching daily bars from the market-data provider.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("No data received for {0}")]
    NoData(String),
    #[error("Provider rejected the request: {code}: {description}")]
    Provider { code: String, description: String },
    #[error("Provider returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Failed to parse provider response: {0}")]
    ParseFailed(String),
    #[error("Network error")]
    Network(#[from] reqwest::Error),
    #[error("Failed to fetch quotes after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<QuoteError>,
    },
}
