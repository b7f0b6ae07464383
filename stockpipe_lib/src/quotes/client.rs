//! HTTP client for the market-data provider's daily-chart endpoint.
//!
//! Requests the most recent single-day bar for one ticker and decodes the
//! columnar chart payload into a [`RawQuoteTable`]. A response with zero
//! rows is an error: the pipeline has nothing to append and the fetch
//! wrapper treats it as retryable.

use std::time::Duration;

use super::error::QuoteError;
use super::types::{ChartResponse, RawQuoteTable};

/// Request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Client for the provider's v8 chart API.
pub struct QuoteClient {
    client: reqwest::Client,
    base_url: String,
}

impl QuoteClient {
    /// Create a client pointing at the production endpoint.
    pub fn new() -> Result<Self, QuoteError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str) -> Result<Self, QuoteError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch the most recent daily bar for `ticker`.
    ///
    /// Returns the raw columnar table with at least one row, or an error.
    /// Provider-side errors embedded in a 200 body surface as
    /// [`QuoteError::Provider`]; an empty result set surfaces as
    /// [`QuoteError::NoData`].
    pub async fn latest_daily_bar(&self, ticker: &str) -> Result<RawQuoteTable, QuoteError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let response = self
            .client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::ParseFailed(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(QuoteError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: ChartResponse = serde_json::from_str(&body).map_err(|e| {
            QuoteError::ParseFailed(format!(
                "Failed to deserialize response: {} | body: {}",
                e,
                truncate_body(&body)
            ))
        })?;

        if let Some(err) = parsed.chart.error {
            return Err(QuoteError::Provider {
                code: err.code,
                description: err.description,
            });
        }

        let result = parsed
            .chart
            .result
            .and_then(|mut v| if v.is_empty() { None } else { Some(v.swap_remove(0)) })
            .ok_or_else(|| QuoteError::NoData(ticker.to_string()))?;

        let mut table = RawQuoteTable::from(result);
        table.ticker = ticker.to_string();

        if table.is_empty() {
            return Err(QuoteError::NoData(ticker.to_string()));
        }

        tracing::info!("Successfully fetched {} row(s) for {}", table.len(), ticker);
        Ok(table)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
