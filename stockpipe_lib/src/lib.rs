//! Library layer for stockpipe: a periodic job that fetches one ticker's
//! most recent daily OHLCV bar, normalizes it into a fixed six-column
//! shape, and appends it to a cloud warehouse table.
//!
//! Transient provider errors are retried with a fixed delay; the
//! warehouse's service-unavailable condition is retried with linear
//! backoff. Validation failures fail fast. The binary crate owns the
//! scheduling loop.

pub mod config;
pub mod pipeline;
pub mod quotes;
pub mod retry;
pub mod transform;
pub mod warehouse;

pub use config::{Config, ConfigError};
pub use pipeline::{Pipeline, PipelineError};
pub use quotes::{QuoteClient, QuoteError, RawQuoteTable};
pub use transform::{DailyBar, TransformError};
pub use warehouse::{TableRef, WarehouseClient, WarehouseError};
