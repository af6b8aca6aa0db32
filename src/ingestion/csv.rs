//! Comma-delimited table reader.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RawRow, Value};

/// Read a CSV file into raw rows.
pub fn read_csv_rows_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv_rows_from_reader(&mut rdr)
}

/// Read CSV bytes (e.g. an uploaded file body) into raw rows.
pub fn read_csv_rows_from_bytes(bytes: &[u8]) -> IngestionResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    read_csv_rows_from_reader(&mut rdr)
}

/// Read raw rows from an existing CSV reader.
///
/// Rules:
///
/// - The first record is the header row; header names are trimmed. Input without a header row is
///   rejected.
/// - A data row shorter than the header is kept; its missing trailing columns are absent from
///   the row. The reader must be `flexible` for this, as the path and byte helpers are.
/// - A data row longer than the header fails the whole call with [`IngestionError::Parse`].
/// - Cells are trimmed; empty cells become [`Value::Null`], everything else [`Value::Utf8`].
/// - If a header name repeats, the first column with that name wins.
pub fn read_csv_rows_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Vec<RawRow>> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestionError::Parse {
            message: "input has no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(IngestionError::Parse {
                message: format!(
                    "line {line} has {} fields but the header has {}",
                    record.len(),
                    headers.len()
                ),
            });
        }

        let mut row = RawRow::new();
        for (header, raw) in headers.iter().zip(record.iter()) {
            if header.is_empty() || row.get(header).is_some() {
                continue;
            }
            let trimmed = raw.trim();
            let value = if trimmed.is_empty() {
                Value::Null
            } else {
                Value::Utf8(trimmed.to_owned())
            };
            row.insert(header.as_str(), value);
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::read_csv_rows_from_bytes;
    use crate::error::IngestionError;
    use crate::types::Value;

    #[test]
    fn reads_trimmed_headers_and_cells() {
        let rows = read_csv_rows_from_bytes(b" Equipment Name ,Flowrate\n Pump A , 12.5 \n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Equipment Name"), Some(&Value::Utf8("Pump A".to_string())));
        assert_eq!(rows[0].get("Flowrate"), Some(&Value::Utf8("12.5".to_string())));
    }

    #[test]
    fn empty_cells_become_null() {
        let rows = read_csv_rows_from_bytes(b"Equipment Name,Type\nPump A,\n").unwrap();
        assert_eq!(rows[0].get("Type"), Some(&Value::Null));
    }

    #[test]
    fn first_duplicate_header_wins() {
        let rows = read_csv_rows_from_bytes(b"Type,Type\nPump,Valve\n").unwrap();
        assert_eq!(rows[0].get("Type"), Some(&Value::Utf8("Pump".to_string())));
    }

    #[test]
    fn overlong_rows_fail_the_batch() {
        let err = read_csv_rows_from_bytes(b"a,b\n1,2\n1,2,3\n").unwrap_err();
        assert!(matches!(err, IngestionError::Parse { .. }));
        assert!(err.to_string().contains("line 3 has 3 fields but the header has 2"));
    }

    #[test]
    fn short_rows_leave_trailing_columns_absent() {
        let rows = read_csv_rows_from_bytes(b"a,b,c\n1,2,3\n4\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("a"), Some(&Value::Utf8("4".to_string())));
        assert_eq!(rows[1].get("b"), None);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn missing_header_row_fails() {
        let err = read_csv_rows_from_bytes(b"").unwrap_err();
        assert!(err.to_string().contains("no header row"));
    }
}
