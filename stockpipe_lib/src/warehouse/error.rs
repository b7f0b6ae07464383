//! Error types for warehouse operations.

use thiserror::Error;

/// Errors from appending rows to the warehouse table.
///
/// Only [`WarehouseError::Unavailable`] is transient; the upload wrapper
/// retries it and surfaces everything else immediately.
#[derive(Error, Debug)]
pub enum WarehouseError {
    #[error("No data to upload")]
    EmptyUpload,
    #[error("Warehouse service unavailable (HTTP 503)")]
    Unavailable,
    #[error("Warehouse rejected credentials (HTTP {0})")]
    AuthRejected(u16),
    #[error("Warehouse request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Warehouse rejected {count} row(s): {detail}")]
    RowsRejected { count: usize, detail: String },
    #[error("Failed to parse warehouse response: {0}")]
    ParseFailed(String),
    #[error("Network error")]
    Network(#[from] reqwest::Error),
}
