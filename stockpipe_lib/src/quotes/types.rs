//! Response types for the daily-chart provider endpoint.

use serde::Deserialize;

/// Top-level chart response. The payload nests the actual table under
/// `chart.result[0]`; provider-side failures arrive in `chart.error`
/// with an HTTP 200.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartProviderError>,
}

/// Error body the provider embeds in an otherwise-successful response.
#[derive(Debug, Deserialize)]
pub struct ChartProviderError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    /// Unix timestamps keying the sessions, one per row.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    /// OHLCV series, parallel to `timestamp`. The provider always sends
    /// exactly one entry here for a single-ticker request.
    #[serde(default)]
    pub quote: Vec<QuoteColumns>,
    /// Adjusted-close series. Extra column; the transformer drops it.
    #[serde(default)]
    pub adjclose: Vec<AdjCloseColumn>,
}

/// Columnar OHLCV arrays. Any column may be absent, and present columns
/// may hold null cells for halted sessions.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteColumns {
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
    pub close: Option<Vec<Option<f64>>>,
    pub volume: Option<Vec<Option<i64>>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjCloseColumn {
    pub adjclose: Option<Vec<Option<f64>>>,
}

/// The raw quote table handed to the transformer: session timestamps plus
/// parallel optional columns, exactly as the provider returned them.
#[derive(Debug, Clone)]
pub struct RawQuoteTable {
    pub ticker: String,
    pub timestamps: Vec<i64>,
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
    pub close: Option<Vec<Option<f64>>>,
    pub volume: Option<Vec<Option<i64>>>,
    /// Provider extra, not part of the normalized schema.
    pub adj_close: Option<Vec<Option<f64>>>,
}

impl RawQuoteTable {
    /// Number of sessions (rows) in the table.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl From<ChartResult> for RawQuoteTable {
    fn from(mut result: ChartResult) -> Self {
        let quote = if result.indicators.quote.is_empty() {
            QuoteColumns::default()
        } else {
            result.indicators.quote.swap_remove(0)
        };
        let adj_close = result
            .indicators
            .adjclose
            .into_iter()
            .next()
            .and_then(|c| c.adjclose);
        Self {
            ticker: String::new(),
            timestamps: result.timestamp,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
            adj_close,
        }
    }
}
