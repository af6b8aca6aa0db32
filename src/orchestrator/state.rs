use serde::Serialize;

use crate::history::{HistoryEntry, HistoryLedger};
use crate::types::{EquipmentRecord, Summary};

/// Lifecycle state of an [`super::IngestionOrchestrator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadState {
    /// Nothing loaded (initial state, or after `clear`).
    Idle,
    /// An ingestion is in flight.
    Loading,
    /// A summary is displayed.
    Ready,
    /// The last ingestion failed; last-good data is still displayed.
    Failed,
}

/// Point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub state: LoadState,
    /// Records of the last successful ingestion (possibly empty).
    pub records: Vec<EquipmentRecord>,
    /// Displayed summary; `None` before the first success or after `clear`.
    pub summary: Option<Summary>,
    /// Retained history, newest first.
    pub history: Vec<HistoryEntry>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub(crate) struct DashboardState {
    pub(crate) load_state: LoadState,
    pub(crate) records: Vec<EquipmentRecord>,
    pub(crate) summary: Option<Summary>,
    pub(crate) ledger: HistoryLedger,
    pub(crate) error: Option<String>,
}

impl DashboardState {
    pub(crate) fn new() -> Self {
        Self {
            load_state: LoadState::Idle,
            records: Vec::new(),
            summary: None,
            ledger: HistoryLedger::new(),
            error: None,
        }
    }

    /// Move to `to`, returning the `(from, to)` pair for notification.
    pub(crate) fn transition(&mut self, to: LoadState) -> (LoadState, LoadState) {
        let from = self.load_state;
        self.load_state = to;
        (from, to)
    }

    pub(crate) fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            state: self.load_state,
            records: self.records.clone(),
            summary: self.summary.clone(),
            history: self.ledger.entries().to_vec(),
            is_loading: self.load_state == LoadState::Loading,
            error: self.error.clone(),
        }
    }
}
