//! Warehouse loader: streaming-insert client plus the retry wrapper the
//! pipeline calls.
//!
//! Appends are the only write the pipeline performs. The wrapper retries
//! nothing except the service-unavailable condition; validation and auth
//! failures would fail identically on the next attempt.

pub mod client;
pub mod error;
pub mod types;

use std::time::Duration;

pub use client::{TableRef, WarehouseClient};
pub use error::WarehouseError;

use crate::retry;
use crate::transform::DailyBar;

/// Total attempts per upload, counting the first.
pub const UPLOAD_ATTEMPTS: u32 = 3;

/// Linear backoff step: failed attempt *n* waits `n *` this duration.
pub const UPLOAD_BACKOFF_STEP: Duration = Duration::from_secs(5);

/// Append `bars` to `dest`, retrying only [`WarehouseError::Unavailable`]
/// up to [`UPLOAD_ATTEMPTS`] attempts with linear backoff (5s, then 10s).
/// An empty input fails immediately without touching the network; after
/// the retry budget the unavailable error is re-raised as-is.
pub async fn upload_bars(
    client: &WarehouseClient,
    dest: &TableRef,
    bars: &[DailyBar],
) -> Result<(), WarehouseError> {
    upload_bars_with(client, dest, bars, UPLOAD_ATTEMPTS, UPLOAD_BACKOFF_STEP).await
}

/// Retry-budget-parameterized variant of [`upload_bars`].
pub async fn upload_bars_with(
    client: &WarehouseClient,
    dest: &TableRef,
    bars: &[DailyBar],
    attempts: u32,
    backoff_step: Duration,
) -> Result<(), WarehouseError> {
    if bars.is_empty() {
        return Err(WarehouseError::EmptyUpload);
    }
    retry::retry_linear(
        attempts,
        backoff_step,
        |e| matches!(e, WarehouseError::Unavailable),
        || client.insert_all(dest, bars),
    )
    .await
}
