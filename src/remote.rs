//! Remote service boundary.
//!
//! The pipeline does not speak any transport protocol itself. A caller that talks to a backend
//! implements [`RemoteBoundary`] and hands it to the orchestrator via
//! [`crate::orchestrator::SummarySource::Remote`]; the orchestrator then prefers the server's
//! summary and history over local recomputation.
//!
//! The wire types derive `serde` so an implementation can decode the backend's JSON directly:
//!
//! ```
//! use equipment_data_pipeline::remote::UploadAck;
//!
//! let ack: UploadAck = serde_json::from_str(r#"{
//!     "id": 7,
//!     "file_name": "plant.csv",
//!     "record_count": 3,
//!     "uploaded_at": "2026-01-02T03:04:05Z",
//!     "summary": {"totalCount": 3, "avgFlowrate": 120.0, "typeDistribution": {"Pump": 3}}
//! }"#).unwrap();
//! assert_eq!(ack.id, "7");
//! assert_eq!(ack.summary.unwrap().total_count, 3);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::history::HistoryEntry;
use crate::types::Summary;

/// Failure talking to the remote service.
///
/// The variants keep apart the three situations a user needs to tell apart: the server never
/// answered, the server answered with an error, or the request never left the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request was sent but no response arrived (connection refused, timeout, ...).
    #[error("no response from server: {0}")]
    NoResponse(String),

    /// The server answered with a non-success status.
    #[error("server returned error {status}: {message}")]
    ErrorResponse { status: u16, message: String },

    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Client(String),
}

/// Server acknowledgment for an uploaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadAck {
    /// Server-assigned dataset id. Numeric ids are accepted and kept as text.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub file_name: String,
    pub record_count: usize,
    pub uploaded_at: DateTime<Utc>,
    /// Summary computed by the server, if it sent one with the acknowledgment.
    #[serde(default)]
    pub summary: Option<Summary>,
}

/// Operations the orchestrator needs from a remote service.
///
/// Each call is one blocking round trip from the orchestrator's point of view.
pub trait RemoteBoundary: Send + Sync {
    /// Upload the raw table bytes under `file_name`.
    fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<UploadAck, TransportError>;

    /// Fetch the server's current summary.
    fn fetch_summary(&self) -> Result<Summary, TransportError>;

    /// Fetch the server's ingestion history, newest first.
    fn fetch_history(&self) -> Result<Vec<HistoryEntry>, TransportError>;
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{TransportError, UploadAck};

    #[test]
    fn transport_messages_distinguish_causes() {
        let none = TransportError::NoResponse("connection refused".to_string()).to_string();
        let status = TransportError::ErrorResponse {
            status: 400,
            message: "Only CSV files are allowed".to_string(),
        }
        .to_string();
        let client = TransportError::Client("invalid url".to_string()).to_string();

        assert!(none.starts_with("no response"));
        assert!(status.contains("400") && status.contains("Only CSV files are allowed"));
        assert!(client.starts_with("request failed"));
    }

    #[test]
    fn upload_ack_accepts_string_id_without_summary() {
        let ack: UploadAck = serde_json::from_str(
            r#"{"id":"abc","file_name":"a.csv","record_count":0,"uploaded_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(ack.id, "abc");
        assert!(ack.summary.is_none());
    }
}
