//! Raw row → [`EquipmentRecord`] normalization.
//!
//! Column names vary between sources (`Equipment Name`, `equipment_name`, `EquipmentName`, ...).
//! Each canonical field has a fixed, ordered list of accepted spellings; the first spelling that
//! is present with a non-blank value wins.

use crate::types::{EquipmentRecord, RawRow, Value};

/// The canonical fields of an [`EquipmentRecord`] that are read from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    EquipmentName,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl CanonicalField {
    /// Accepted column spellings, highest priority first.
    pub fn accepted_keys(self) -> &'static [&'static str] {
        match self {
            Self::EquipmentName => &[
                "Equipment Name",
                "equipment_name",
                "EquipmentName",
                "equipmentName",
                "Equipment",
                "Name",
            ],
            Self::Type => &["Type", "type"],
            Self::Flowrate => &["Flowrate", "flowrate", "Flow Rate", "flow_rate"],
            Self::Pressure => &["Pressure", "pressure"],
            Self::Temperature => &["Temperature", "temperature"],
        }
    }

    /// First non-blank value under one of the accepted spellings.
    pub fn resolve(self, row: &RawRow) -> Option<&Value> {
        self.accepted_keys()
            .iter()
            .filter_map(|key| row.get(key))
            .find(|v| !v.is_blank())
    }
}

/// Normalize raw rows into equipment records.
///
/// - Text fields are trimmed; a missing text field is `""`.
/// - Numeric text is read up to the end of its leading number (`"120 bar"` is `120.0`).
/// - Numeric fields that are missing, have no leading number, or are non-finite become `0.0`.
/// - Rows whose equipment name resolves to empty are dropped.
/// - Surviving records are numbered `eq-1`, `eq-2`, ... in output order.
pub fn normalize_rows(rows: &[RawRow]) -> Vec<EquipmentRecord> {
    let mut out = Vec::with_capacity(rows.len());
    for (idx0, row) in rows.iter().enumerate() {
        let name = resolve_text(row, CanonicalField::EquipmentName);
        if name.is_empty() {
            tracing::trace!(row = idx0 + 1, "skipping row without equipment name");
            continue;
        }
        out.push(EquipmentRecord {
            id: format!("eq-{}", out.len() + 1),
            equipment_name: name,
            equipment_type: resolve_text(row, CanonicalField::Type),
            flowrate: resolve_number(row, CanonicalField::Flowrate),
            pressure: resolve_number(row, CanonicalField::Pressure),
            temperature: resolve_number(row, CanonicalField::Temperature),
        });
    }
    out
}

fn resolve_text(row: &RawRow, field: CanonicalField) -> String {
    field
        .resolve(row)
        .map(|v| v.as_text().trim().to_owned())
        .unwrap_or_default()
}

fn resolve_number(row: &RawRow, field: CanonicalField) -> f64 {
    let n = match field.resolve(row) {
        Some(Value::Float64(v)) => *v,
        Some(Value::Int64(v)) => *v as f64,
        Some(Value::Utf8(s)) => leading_float(s).unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Parse the longest decimal prefix of `s` after leading whitespace, so `"12.5 m3/h"` reads as
/// `12.5`. Returns `None` when no digits lead the text.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }

    // An exponent only counts when digits follow it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
