#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RawRow, Value};

/// Read a workbook sheet (`.xlsx`, `.xls`, `.ods`, etc.) into raw rows.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows, keeping numeric/bool cells typed and strings trimmed
/// - Skips rows whose cells are all empty
pub fn read_excel_rows_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> IngestionResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::Parse {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    rows_from_range(&sheet, &range)
}

fn rows_from_range(sheet: &str, range: &calamine::Range<Data>) -> IngestionResult<Vec<RawRow>> {
    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| IngestionError::Parse {
            message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
        })?
        .iter()
        .map(|c| cell_to_header_string(c).trim().to_owned())
        .collect();

    let mut rows = Vec::new();
    for cells in rows_iter {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let mut row = RawRow::new();
        for (header, cell) in headers.iter().zip(cells.iter()) {
            if header.is_empty() || row.get(header).is_some() {
                continue;
            }
            row.insert(header.as_str(), convert_cell(cell));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::Utf8(trimmed.to_owned())
            }
        }
        other => Value::Utf8(other.to_string()),
    }
}
