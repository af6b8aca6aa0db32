//! JSON row reader.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"Type":"Pump"}, {"Type":"Valve"}]`
//! - A single JSON object (one row)
//! - Newline-delimited JSON (NDJSON): `{"Type":"Pump"}\n{"Type":"Valve"}\n`
//!
//! This is also the path for rows that were already decoded from a remote response: pass the
//! decoded values to [`rows_from_json_values`].

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RawRow, Value};

/// Read a JSON/NDJSON file into raw rows.
pub fn read_json_rows_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<RawRow>> {
    let text = fs::read_to_string(path)?;
    read_json_rows(&text)
}

/// Read JSON/NDJSON text into raw rows.
pub fn read_json_rows(input: &str) -> IngestionResult<Vec<RawRow>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::Parse {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => rows_from_json_values(&items),
            serde_json::Value::Object(_) => rows_from_json_values(std::slice::from_ref(&v)),
            _ => Err(IngestionError::Parse {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| IngestionError::Parse {
                message: format!("invalid ndjson at line {}: {}", i + 1, e),
            })?;
            values.push(v);
        }
        rows_from_json_values(&values)
    }
}

/// Convert decoded JSON objects into raw rows.
///
/// Scalars keep their JSON type; nested arrays/objects are kept as their JSON text.
pub fn rows_from_json_values(values: &[serde_json::Value]) -> IngestionResult<Vec<RawRow>> {
    values
        .iter()
        .enumerate()
        .map(|(idx0, v)| -> IngestionResult<RawRow> {
            let obj = v.as_object().ok_or_else(|| IngestionError::Parse {
                message: format!("row {} is not a json object", idx0 + 1),
            })?;
            let row: RawRow = obj.iter().map(|(k, jv)| (k.as_str(), convert_json_value(jv))).collect();
            Ok(row)
        })
        .collect()
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}
