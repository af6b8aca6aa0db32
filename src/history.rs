//! Bounded, newest-first ingestion history.
//!
//! A [`HistoryLedger`] keeps at most [`HISTORY_CAPACITY`] [`HistoryEntry`] values. Recording a
//! new entry prepends it and drops whatever falls past the cap; dropped entries never come back.
//! Entries keep only the derived [`Summary`] of their ingestion, not the records themselves.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::remote::string_or_number;
use crate::types::Summary;

/// Maximum number of entries a ledger retains.
pub const HISTORY_CAPACITY: usize = 5;

static ENTRY_SEQ: AtomicU64 = AtomicU64::new(0);

/// An immutable record of one past ingestion.
///
/// Fields are private; an entry cannot change after it is minted. The serde shape matches the
/// backend's history listing (`file_name`, `uploaded_at`, `record_count`, `summary`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(rename = "file_name")]
    source_label: String,
    #[serde(rename = "uploaded_at")]
    created_at: DateTime<Utc>,
    record_count: usize,
    #[serde(default)]
    summary: Summary,
}

impl HistoryEntry {
    /// Mint a new entry stamped with the current time.
    ///
    /// The id is `upload-<unix-millis>-<seq>`; `seq` is process-wide and strictly increasing,
    /// so two entries minted within the same millisecond still get distinct ids.
    pub fn new(source_label: impl Into<String>, record_count: usize, summary: Summary) -> Self {
        let created_at = Utc::now();
        let seq = ENTRY_SEQ.fetch_add(1, Ordering::SeqCst) + 1;
        Self {
            id: format!("upload-{}-{seq}", created_at.timestamp_millis()),
            source_label: source_label.into(),
            created_at,
            record_count,
            summary,
        }
    }

    /// Rebuild an entry from parts supplied elsewhere (e.g. a remote history listing).
    pub fn from_parts(
        id: impl Into<String>,
        source_label: impl Into<String>,
        created_at: DateTime<Utc>,
        record_count: usize,
        summary: Summary,
    ) -> Self {
        Self {
            id: id.into(),
            source_label: source_label.into(),
            created_at,
            record_count,
            summary,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// File name or synthetic label the ingestion came from.
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// Newest-first store of [`HistoryEntry`] values, capped at [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `entry`, evicting the oldest entries beyond the cap.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Summary of the entry with `id`, if it is still retained.
    pub fn find(&self, id: &str) -> Option<&Summary> {
        self.get(id).map(HistoryEntry::summary)
    }

    /// The whole entry with `id`, if it is still retained.
    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Install an externally supplied listing (assumed newest first), truncated to the cap.
    pub fn replace_all(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        HISTORY_CAPACITY
    }
}
