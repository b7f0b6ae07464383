//! HTTP client for the warehouse's synchronous streaming-insert endpoint.
//!
//! One call appends the given rows and blocks until the service
//! acknowledges the write; there is no job to poll afterwards. The target
//! table's schema is managed by the warehouse, not by this client.

use std::fmt;
use std::time::Duration;

use super::error::WarehouseError;
use super::types::{InsertAllRequest, InsertAllResponse};
use crate::transform::DailyBar;

/// Request timeout for warehouse calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com";

/// Fully-qualified destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn new(project: &str, dataset: &str, table: &str) -> Self {
        Self {
            project: project.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

/// Warehouse client authenticating with a service-account bearer token.
///
/// A fresh client per pipeline construction; there is no pooling beyond
/// what reqwest's connection reuse provides.
pub struct WarehouseClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl WarehouseClient {
    /// Create a client pointing at the production endpoint.
    pub fn new(token: String) -> Result<Self, WarehouseError> {
        Self::with_base_url(DEFAULT_BASE_URL, token)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str, token: String) -> Result<Self, WarehouseError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token,
        })
    }

    /// Append `bars` to `dest`, blocking until the service acknowledges.
    ///
    /// HTTP 503 maps to [`WarehouseError::Unavailable`] so the upload
    /// wrapper can retry it; row-level rejections inside a 200 response
    /// surface as [`WarehouseError::RowsRejected`].
    pub async fn insert_all(
        &self,
        dest: &TableRef,
        bars: &[DailyBar],
    ) -> Result<(), WarehouseError> {
        let url = format!(
            "{}/bigquery/v2/projects/{}/datasets/{}/tables/{}/insertAll",
            self.base_url, dest.project, dest.dataset, dest.table
        );
        let request = InsertAllRequest::new(bars);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(WarehouseError::Unavailable);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(WarehouseError::AuthRejected(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            WarehouseError::ParseFailed(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            return Err(WarehouseError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: InsertAllResponse = serde_json::from_str(&body).map_err(|e| {
            WarehouseError::ParseFailed(format!(
                "Failed to deserialize response: {} | body: {}",
                e,
                truncate_body(&body)
            ))
        })?;

        if !parsed.insert_errors.is_empty() {
            let detail = parsed
                .insert_errors
                .first()
                .and_then(|row| row.errors.first())
                .map(|e| format!("{}: {}", e.reason, e.message))
                .unwrap_or_else(|| "no detail provided".to_string());
            return Err(WarehouseError::RowsRejected {
                count: parsed.insert_errors.len(),
                detail,
            });
        }

        tracing::info!("Successfully uploaded {} row(s) to {}", bars.len(), dest);
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bar() -> DailyBar {
        DailyBar {
            date: "2024-05-01".to_string(),
            open: 100.0,
            high: 105.0,
            low: 99.0,
            close: 102.0,
            volume: 1_000_000,
        }
    }

    fn dest() -> TableRef {
        TableRef::new("demo-project", "market_data", "daily_bars")
    }

    const INSERT_PATH: &str =
        "/bigquery/v2/projects/demo-project/datasets/market_data/tables/daily_bars/insertAll";

    #[tokio::test]
    async fn success_posts_rows_with_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(INSERT_PATH))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({
                "rows": [{"json": {
                    "Date": "2024-05-01",
                    "Open": 100.0,
                    "High": 105.0,
                    "Low": 99.0,
                    "Close": 102.0,
                    "Volume": 1000000
                }}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "bigquery#tableDataInsertAllResponse"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            WarehouseClient::with_base_url(&server.uri(), "test-token".to_string()).unwrap();
        client.insert_all(&dest(), &[bar()]).await.unwrap();
    }

    #[tokio::test]
    async fn service_unavailable_maps_to_transient_variant() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(INSERT_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client =
            WarehouseClient::with_base_url(&server.uri(), "test-token".to_string()).unwrap();
        let err = client.insert_all(&dest(), &[bar()]).await.unwrap_err();

        assert!(matches!(err, WarehouseError::Unavailable));
    }

    #[tokio::test]
    async fn rejected_credentials_surface_immediately() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(INSERT_PATH))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client =
            WarehouseClient::with_base_url(&server.uri(), "bad-token".to_string()).unwrap();
        let err = client.insert_all(&dest(), &[bar()]).await.unwrap_err();

        assert!(matches!(err, WarehouseError::AuthRejected(401)));
    }

    #[tokio::test]
    async fn row_level_errors_in_200_response_are_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(INSERT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "bigquery#tableDataInsertAllResponse",
                "insertErrors": [{
                    "index": 0,
                    "errors": [{"reason": "invalid", "message": "Field Volume is type STRING"}]
                }]
            })))
            .mount(&server)
            .await;

        let client =
            WarehouseClient::with_base_url(&server.uri(), "test-token".to_string()).unwrap();
        let err = client.insert_all(&dest(), &[bar()]).await.unwrap_err();

        match err {
            WarehouseError::RowsRejected { count, detail } => {
                assert_eq!(count, 1);
                assert!(detail.contains("invalid"));
            }
            other => panic!("expected RowsRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn other_server_error_is_not_transient() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(INSERT_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid dataset ID"))
            .mount(&server)
            .await;

        let client =
            WarehouseClient::with_base_url(&server.uri(), "test-token".to_string()).unwrap();
        let err = client.insert_all(&dest(), &[bar()]).await.unwrap_err();

        assert!(matches!(err, WarehouseError::HttpStatus { status: 400, .. }));
    }

    #[test]
    fn table_ref_displays_fully_qualified() {
        assert_eq!(dest().to_string(), "demo-project.market_data.daily_bars");
    }
}
