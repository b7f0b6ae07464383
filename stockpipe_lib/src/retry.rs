//! Async retry helpers shared by the fetcher and the loader.
//!
//! Two policies cover the pipeline's needs: a fixed-delay retry on any
//! error for the fetch path, and a linear-backoff retry gated by a
//! transience predicate for the upload path. All waits go through
//! `tokio::time::sleep` so tests can pin the timing under paused time.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Run `operation` up to `max_attempts` times, sleeping a constant `delay`
/// between attempts. Any error is retried; the last error is returned
/// once the budget is spent.
pub async fn retry_fixed<F, Fut, T, E>(
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) if attempt < max_attempts => {
                tracing::warn!(
                    "Attempt {} failed: {}. Retrying in {}s...",
                    attempt,
                    e,
                    delay.as_secs()
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run `operation` up to `max_attempts` times, retrying only errors that
/// `is_transient` accepts. After failed attempt *n* the wait is
/// `n * base_delay` (5s, 10s, ... for a 5-second base). Non-transient
/// errors and the final transient error return immediately.
pub async fn retry_linear<F, Fut, T, E, P>(
    max_attempts: u32,
    base_delay: Duration,
    is_transient: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) if attempt < max_attempts && is_transient(&e) => {
                let wait = base_delay * attempt;
                tracing::warn!(
                    "Attempt {} failed: {}. Retrying in {}s...",
                    attempt,
                    e,
                    wait.as_secs()
                );
                sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
