//! Wire types for the warehouse streaming-insert endpoint.

use serde::{Deserialize, Serialize};

use crate::transform::DailyBar;

/// Streaming-insert request body. Rows append to the target table;
/// nothing in this API can update or delete existing rows.
#[derive(Debug, Serialize)]
pub struct InsertAllRequest {
    pub kind: &'static str,
    pub rows: Vec<InsertRow>,
}

impl InsertAllRequest {
    pub fn new(bars: &[DailyBar]) -> Self {
        Self {
            kind: "bigquery#tableDataInsertAllRequest",
            rows: bars
                .iter()
                .map(|bar| InsertRow { json: bar.clone() })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InsertRow {
    pub json: DailyBar,
}

/// Streaming-insert response. A 200 status can still carry per-row
/// rejections in `insert_errors`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAllResponse {
    #[serde(default)]
    pub insert_errors: Vec<InsertError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertError {
    pub index: u32,
    #[serde(default)]
    pub errors: Vec<ErrorProto>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}
