//! Path-based reading with format inference.
//!
//! [`read_rows_from_path`] reads a file into [`crate::types::RawRow`]s. If no format is forced,
//! it is inferred from the file extension.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::RawRow;

use super::{csv, json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn infer(path: &Path) -> IngestionResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| IngestionError::UnsupportedFormat {
                message: format!("cannot infer format: path has no extension ({})", path.display()),
            })?;

        Self::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
            message: format!("cannot infer format from extension '{ext}' for path ({})", path.display()),
        })
    }
}

/// Read a file into raw rows.
///
/// - If `format` is `None`, the format is inferred from the file extension.
/// - Workbooks read the first sheet and require the `excel` feature.
///
/// ```no_run
/// use equipment_data_pipeline::ingestion::{normalize_rows, read_rows_from_path};
///
/// # fn main() -> Result<(), equipment_data_pipeline::IngestionError> {
/// let rows = read_rows_from_path("plant.csv", None)?;
/// let records = normalize_rows(&rows);
/// println!("records={}", records.len());
/// # Ok(())
/// # }
/// ```
pub fn read_rows_from_path(path: impl AsRef<Path>, format: Option<IngestionFormat>) -> IngestionResult<Vec<RawRow>> {
    let path = path.as_ref();
    let fmt = match format {
        Some(f) => f,
        None => IngestionFormat::infer(path)?,
    };

    match fmt {
        IngestionFormat::Csv => csv::read_csv_rows_from_path(path),
        IngestionFormat::Json => json::read_json_rows_from_path(path),
        IngestionFormat::Excel => read_excel_dispatch(path),
    }
}

fn read_excel_dispatch(path: &Path) -> IngestionResult<Vec<RawRow>> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_excel_rows_from_path(path, None)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = path;
        Err(IngestionError::UnsupportedFormat {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::IngestionFormat;

    #[test]
    fn infers_format_from_extension() {
        assert_eq!(IngestionFormat::infer(Path::new("a/b.CSV")).unwrap(), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::infer(Path::new("rows.ndjson")).unwrap(), IngestionFormat::Json);
        assert_eq!(IngestionFormat::infer(Path::new("book.xlsx")).unwrap(), IngestionFormat::Excel);
    }

    #[test]
    fn unknown_or_missing_extension_is_unsupported() {
        let err = IngestionFormat::infer(Path::new("report.pdf")).unwrap_err();
        assert!(err.to_string().contains("unsupported format"));
        assert!(IngestionFormat::infer(Path::new("no_extension")).is_err());
    }
}
