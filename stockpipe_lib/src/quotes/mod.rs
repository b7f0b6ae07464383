//! Market-data fetcher: daily-chart client plus the retry wrapper the
//! pipeline calls.
//!
//! Every failure mode is retried here, including a well-formed response
//! with zero rows; the provider intermittently returns empty tables that
//! resolve themselves on the next attempt.

pub mod client;
pub mod error;
pub mod types;

use std::time::Duration;

pub use client::QuoteClient;
pub use error::QuoteError;
pub use types::RawQuoteTable;

use crate::retry;

/// Total attempts per fetch, counting the first.
pub const FETCH_ATTEMPTS: u32 = 3;

/// Fixed delay between fetch attempts.
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fetch the most recent daily bar for `ticker`, retrying any error up to
/// [`FETCH_ATTEMPTS`] attempts with a fixed [`FETCH_RETRY_DELAY`] between
/// them. After the final attempt the last error is wrapped with the
/// attempt count; no partial result is ever returned.
pub async fn fetch_daily_bars(
    client: &QuoteClient,
    ticker: &str,
) -> Result<RawQuoteTable, QuoteError> {
    fetch_daily_bars_with(client, ticker, FETCH_ATTEMPTS, FETCH_RETRY_DELAY).await
}

/// Retry-budget-parameterized variant of [`fetch_daily_bars`].
pub async fn fetch_daily_bars_with(
    client: &QuoteClient,
    ticker: &str,
    attempts: u32,
    delay: Duration,
) -> Result<RawQuoteTable, QuoteError> {
    retry::retry_fixed(attempts, delay, || client.latest_daily_bar(ticker))
        .await
        .map_err(|e| QuoteError::RetriesExhausted {
            attempts,
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn one_row_chart() -> serde_json::Value {
        serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1714570200i64],
                    "indicators": {
                        "quote": [{
                            "open": [100.0],
                            "high": [105.0],
                            "low": [99.0],
                            "close": [102.0],
                            "volume": [1000000i64]
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    #[tokio::test]
    async fn two_failures_then_success_returns_the_table() {
        let server = MockServer::start().await;

        // First two attempts get a 500, the third gets data.
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/MSFT"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/MSFT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_row_chart()))
            .mount(&server)
            .await;

        let client = QuoteClient::with_base_url(&server.uri()).unwrap();
        let table = fetch_daily_bars_with(&client, "MSFT", 3, Duration::from_millis(10))
            .await
            .unwrap();

        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_name_the_attempt_count() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/MSFT"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = QuoteClient::with_base_url(&server.uri()).unwrap();
        let err = fetch_daily_bars_with(&client, "MSFT", 3, Duration::from_millis(10))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("3 attempts"));
        assert!(matches!(err, QuoteError::RetriesExhausted { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn empty_table_is_retried_like_any_other_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/MSFT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "chart": {"result": [], "error": null}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/MSFT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_row_chart()))
            .mount(&server)
            .await;

        let client = QuoteClient::with_base_url(&server.uri()).unwrap();
        let table = fetch_daily_bars_with(&client, "MSFT", 3, Duration::from_millis(10))
            .await
            .unwrap();

        assert_eq!(table.len(), 1);
    }
}
