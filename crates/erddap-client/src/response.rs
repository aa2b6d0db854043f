//! Parsing of griddap `.json` table responses.
//!
//! ERDDAP serves both axis queries and data queries as a generic table:
//!
//! ```json
//! {"table": {"columnNames": ["time", "latitude", "longitude", "analysed_sst"],
//!            "columnTypes": ["String", "float", "float", "double"],
//!            "rows": [["2026-08-06T12:00:00Z", 18.5, -161.0, 26.4], ...]}}
//! ```
//!
//! Data rows iterate outer axes first (time, then any depth, then latitude,
//! then longitude), which is exactly the row-major order `ScalarGrid` uses.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ErddapError, Result};

#[derive(Debug, Deserialize)]
pub struct GriddapResponse {
    pub table: GriddapTable,
}

#[derive(Debug, Deserialize)]
pub struct GriddapTable {
    #[serde(rename = "columnNames")]
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Parse a response body into the inner table.
pub fn parse_table(url: &str, body: &str) -> Result<GriddapTable> {
    let response: GriddapResponse =
        serde_json::from_str(body).map_err(|e| ErddapError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(response.table)
}

/// Extract a single-column numeric axis (latitude or longitude).
pub fn parse_numeric_axis(table: &GriddapTable, column: &str) -> Result<Vec<f64>> {
    let idx = column_index(table, column)?;
    table
        .rows
        .iter()
        .map(|row| {
            row.get(idx).and_then(Value::as_f64).ok_or_else(|| {
                ErddapError::MissingColumn {
                    column: column.to_string(),
                }
            })
        })
        .collect()
}

/// Extract the time axis, parsing ISO 8601 strings.
pub fn parse_time_axis(table: &GriddapTable) -> Result<Vec<DateTime<Utc>>> {
    let idx = column_index(table, "time")?;
    table
        .rows
        .iter()
        .map(|row| {
            let raw = row.get(idx).and_then(Value::as_str).ok_or_else(|| {
                ErddapError::MissingColumn {
                    column: "time".to_string(),
                }
            })?;
            DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| ErddapError::Parse {
                    url: String::new(),
                    reason: format!("bad time value '{raw}': {e}"),
                })
        })
        .collect()
}

/// Extract the data column of a windowed read as row-major values.
///
/// `expected` is the window's cell count; nulls (clouds, land) become NaN.
pub fn parse_grid_values(table: &GriddapTable, variable: &str, expected: usize) -> Result<Vec<f32>> {
    let idx = column_index(table, variable)?;
    if table.rows.len() != expected {
        return Err(ErddapError::ShapeMismatch {
            expected,
            actual: table.rows.len(),
        });
    }
    Ok(table
        .rows
        .iter()
        .map(|row| match row.get(idx) {
            Some(Value::Null) | None => f32::NAN,
            Some(v) => v.as_f64().map(|f| f as f32).unwrap_or(f32::NAN),
        })
        .collect())
}

fn column_index(table: &GriddapTable, column: &str) -> Result<usize> {
    table
        .column_names
        .iter()
        .position(|c| c == column)
        .ok_or_else(|| ErddapError::MissingColumn {
            column: column.to_string(),
        })
}
