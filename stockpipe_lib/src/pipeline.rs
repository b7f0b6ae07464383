//! One pipeline cycle: fetch, normalize, upload.

use thiserror::Error;

use crate::quotes::{self, QuoteClient, QuoteError};
use crate::transform::{self, TransformError};
use crate::warehouse::{self, TableRef, WarehouseClient, WarehouseError};

/// Errors from a pipeline cycle, wrapping the failing stage. Each stage
/// has already spent its internal retry budget by the time its error
/// arrives here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] QuoteError),
    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),
    #[error("Upload failed: {0}")]
    Upload(#[from] WarehouseError),
}

/// The fetch-normalize-upload pipeline for one ticker and one
/// destination table. Holds nothing between cycles; every run is
/// independent.
pub struct Pipeline {
    quotes: QuoteClient,
    warehouse: WarehouseClient,
    ticker: String,
    dest: TableRef,
}

impl Pipeline {
    pub fn new(
        quotes: QuoteClient,
        warehouse: WarehouseClient,
        ticker: String,
        dest: TableRef,
    ) -> Self {
        Self {
            quotes,
            warehouse,
            ticker,
            dest,
        }
    }

    /// Run a single cycle. Returns the number of rows appended.
    pub async fn run_once(&self) -> Result<usize, PipelineError> {
        tracing::info!("Fetching {} daily data...", self.ticker);
        let raw = quotes::fetch_daily_bars(&self.quotes, &self.ticker).await?;

        tracing::info!("Processing data...");
        let bars = transform::normalize(&raw)?;

        tracing::info!("Uploading to {}...", self.dest);
        warehouse::upload_bars(&self.warehouse, &self.dest, &bars).await?;

        tracing::info!("Pipeline completed successfully ({} row(s))", bars.len());
        Ok(bars.len())
    }
}
