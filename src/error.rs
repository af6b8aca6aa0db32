use thiserror::Error;

use crate::remote::TransportError;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion and orchestration functions.
///
/// Batch-level failures abort the submission they belong to. Row-level problems (a row without
/// an equipment name, a numeric cell that does not parse) never surface here: the row is dropped
/// or the cell coerced to `0.0` instead.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited input is not well-formed tabular data.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The JSON input could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    /// Workbook ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The input was readable but does not have the shape of a table.
    #[error("failed to parse input: {message}")]
    Parse { message: String },

    /// The input format could not be determined or is not enabled in this build.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// The remote boundary failed to deliver.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A history lookup missed. Non-fatal: callers treat it as a no-op.
    #[error("history entry '{id}' not found")]
    HistoryNotFound { id: String },

    /// An ingestion is already in flight; the new request was rejected.
    #[error("an ingestion is already in progress")]
    Busy,
}

impl IngestionError {
    /// Returns `true` for malformed-input failures (CSV/JSON/workbook decoding, shape errors).
    pub fn is_parse_error(&self) -> bool {
        match self {
            Self::Io(_) | Self::Csv(_) | Self::Json(_) | Self::Parse { .. } => true,
            Self::UnsupportedFormat { .. } => true,
            #[cfg(feature = "excel")]
            Self::Excel(_) => true,
            Self::Transport(_) | Self::HistoryNotFound { .. } | Self::Busy => false,
        }
    }
}
