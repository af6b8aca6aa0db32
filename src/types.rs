//! Core data model types.
//!
//! Raw input arrives as [`RawRow`]s (column name → scalar [`Value`]); the normalizer turns them
//! into canonical [`EquipmentRecord`]s, and the aggregator condenses a record set into a
//! [`Summary`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A single scalar cell in a [`RawRow`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// `true` for `Null` and for strings that are empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the value as text. `Null` renders as the empty string.
    pub fn as_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int64(v) => v.to_string(),
            Value::Float64(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Utf8(s) => s.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

/// One undecoded input row: arbitrary column names mapped to scalar values.
///
/// Column names are kept verbatim; matching against accepted spellings happens in
/// [`crate::ingestion::normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: BTreeMap<String, Value>,
}

impl RawRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any previous value under the same column name.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Builder-style [`Self::insert`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Look up a cell by exact column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate `(column, value)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// One normalized row of equipment parameter data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    /// Batch-unique identifier (`eq-<n>`).
    pub id: String,
    /// Non-empty equipment name.
    pub equipment_name: String,
    /// Free-text category; may be empty.
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl EquipmentRecord {
    /// Create a record. Callers are responsible for the non-empty name invariant; the
    /// normalizer only ever emits records that satisfy it.
    pub fn new(
        id: impl Into<String>,
        equipment_name: impl Into<String>,
        equipment_type: impl Into<String>,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Self {
        Self {
            id: id.into(),
            equipment_name: equipment_name.into(),
            equipment_type: equipment_type.into(),
            flowrate,
            pressure,
            temperature,
        }
    }
}

/// Aggregate statistics over a record set at one point in time.
///
/// Serialized with the camelCase keys the dashboard backend uses (`totalCount`, `avgFlowrate`,
/// `typeDistribution`, ...). When deserializing, `null` numeric fields read as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub total_count: usize,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub avg_flowrate: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub avg_pressure: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub avg_temperature: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub min_flowrate: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub max_flowrate: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub min_pressure: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub max_pressure: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub min_temperature: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub max_temperature: f64,
    /// Occurrence count per type, keyed verbatim.
    #[serde(default)]
    pub type_distribution: BTreeMap<String, usize>,
}

impl Summary {
    /// The summary of an empty record set: every number 0, empty distribution.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sum of all distribution counts. Equals `total_count` for summaries built by
    /// [`crate::processing::summarize`].
    pub fn distribution_total(&self) -> usize {
        self.type_distribution.values().sum()
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
