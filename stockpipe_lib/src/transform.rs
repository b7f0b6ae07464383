//! Normalization of the raw quote table into the fixed warehouse schema.
//!
//! The warehouse row shape is frozen: {Date, Open, High, Low, Close,
//! Volume}, in that order, with `Date` rendered as a UTC `YYYY-MM-DD`
//! string. Provider extras such as the adjusted close are dropped here.
//! Validation failures are never retried; a malformed table on one cycle
//! will be just as malformed on the next.

use serde::Serialize;
use thiserror::Error;

use crate::quotes::RawQuoteTable;

/// The required output columns, in their fixed order.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// One normalized trading-session record. Serializes with the exact
/// column names the warehouse table carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Errors from normalizing a raw quote table.
#[derive(Error, Debug, PartialEq)]
pub enum TransformError {
    #[error("No data to process")]
    Empty,
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
    #[error("Session timestamp {0} is out of range")]
    BadTimestamp(i64),
}

/// Normalize a raw quote table into warehouse rows.
///
/// Fails fast on an empty table. A required column counts as missing when
/// the provider omitted it entirely or left it without a value for any
/// session; every missing column is named in the error.
pub fn normalize(raw: &RawQuoteTable) -> Result<Vec<DailyBar>, TransformError> {
    if raw.is_empty() {
        return Err(TransformError::Empty);
    }

    let rows = raw.len();
    let mut missing = Vec::new();
    if !column_complete(&raw.open, rows) {
        missing.push("Open");
    }
    if !column_complete(&raw.high, rows) {
        missing.push("High");
    }
    if !column_complete(&raw.low, rows) {
        missing.push("Low");
    }
    if !column_complete(&raw.close, rows) {
        missing.push("Close");
    }
    if !column_complete(&raw.volume, rows) {
        missing.push("Volume");
    }
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns(missing));
    }

    let open = raw.open.as_ref().expect("validated above");
    let high = raw.high.as_ref().expect("validated above");
    let low = raw.low.as_ref().expect("validated above");
    let close = raw.close.as_ref().expect("validated above");
    let volume = raw.volume.as_ref().expect("validated above");

    let mut bars = Vec::with_capacity(rows);
    for (i, &ts) in raw.timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .ok_or(TransformError::BadTimestamp(ts))?
            .date_naive()
            .format("%Y-%m-%d")
            .to_string();
        bars.push(DailyBar {
            date,
            open: open[i].expect("validated above"),
            high: high[i].expect("validated above"),
            low: low[i].expect("validated above"),
            close: close[i].expect("validated above"),
            volume: volume[i].expect("validated above"),
        });
    }
    Ok(bars)
}

fn column_complete<T: Copy>(column: &Option<Vec<Option<T>>>, rows: usize) -> bool {
    match column {
        Some(values) => values.len() >= rows && values[..rows].iter().all(|v| v.is_some()),
        None => false,
    }
}
