//! Ingestion orchestrator: the dashboard's state machine.
//!
//! [`IngestionOrchestrator`] composes reading, normalization, aggregation and the history ledger,
//! and owns the state the presentation layer renders (see [`DashboardSnapshot`]). It is an
//! explicit context object: create one per dashboard session and share it (e.g. behind an
//! `Arc`); all operations take `&self`.
//!
//! States are [`LoadState::Idle`], [`LoadState::Loading`], [`LoadState::Ready`] and
//! [`LoadState::Failed`]. Only one ingestion may be in flight: a submission, history selection,
//! or clear issued while `Loading` is rejected with [`IngestionError::Busy`]. The fetch step of a
//! submission (file read, network call) runs without holding the state lock, so snapshots stay
//! readable while it blocks.
//!
//! ```rust
//! use equipment_data_pipeline::orchestrator::{DashboardOptions, IngestionOrchestrator, LoadState};
//!
//! let dashboard = IngestionOrchestrator::new(DashboardOptions::default());
//! let csv = b"Equipment Name,Type,Flowrate,Pressure,Temperature\nPump A,Pump,100,5,20\n";
//! let summary = dashboard.submit_csv("plant.csv", csv).unwrap();
//! assert_eq!(summary.total_count, 1);
//!
//! let snap = dashboard.snapshot();
//! assert_eq!(snap.state, LoadState::Ready);
//! assert_eq!(snap.history.len(), 1);
//! assert_eq!(snap.history[0].source_label(), "plant.csv");
//! ```

mod state;

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{IngestionError, IngestionResult};
use crate::history::HistoryEntry;
use crate::ingestion::csv::read_csv_rows_from_bytes;
use crate::ingestion::json::read_json_rows;
use crate::ingestion::{
    normalize_rows, read_rows_from_path, severity_for_error, IngestionContext, IngestionFormat, IngestionObserver,
    IngestionSeverity, IngestionStats,
};
use crate::processing::{generate_sample, summarize, SAMPLE_LABEL};
use crate::remote::RemoteBoundary;
use crate::types::{EquipmentRecord, RawRow, Summary};

pub use state::{DashboardSnapshot, LoadState};

use state::DashboardState;

/// Where summaries and history come from after a byte upload.
#[derive(Clone, Default)]
pub enum SummarySource {
    /// Compute the summary locally and record history locally.
    #[default]
    Local,
    /// Upload raw bytes to the remote service and take its summary and history listing.
    ///
    /// Only submissions that carry raw CSV bytes (`submit_csv`, `submit_path` on a `.csv`) are
    /// uploaded; pre-parsed rows and sample batches are still summarized locally.
    Remote(Arc<dyn RemoteBoundary>),
}

impl fmt::Debug for SummarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("Local"),
            Self::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}

/// What [`IngestionOrchestrator::clear`] does with the history ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearPolicy {
    /// Keep history entries; only the current data, summary and error are wiped.
    #[default]
    RetainHistory,
    /// Also empty the history ledger.
    ClearHistory,
}

/// Options controlling orchestrator behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct DashboardOptions {
    pub summary_source: SummarySource,
    pub clear_policy: ClearPolicy,
    /// Optional observer for state changes, logging and alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
    /// History label for sample batches.
    pub sample_label: String,
}

impl fmt::Debug for DashboardOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardOptions")
            .field("summary_source", &self.summary_source)
            .field("clear_policy", &self.clear_policy)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("sample_label", &self.sample_label)
            .finish()
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            summary_source: SummarySource::Local,
            clear_policy: ClearPolicy::RetainHistory,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
            sample_label: SAMPLE_LABEL.to_string(),
        }
    }
}

enum Payload {
    Rows { rows: Vec<RawRow>, raw: Option<Vec<u8>> },
    Records(Vec<EquipmentRecord>),
}

struct Outcome {
    records: Vec<EquipmentRecord>,
    summary: Summary,
    rows_read: usize,
    remote_history: Option<Vec<HistoryEntry>>,
}

/// Owns the current records, displayed summary, error, and history ledger of one session.
pub struct IngestionOrchestrator {
    opts: DashboardOptions,
    state: Mutex<DashboardState>,
}

impl fmt::Debug for IngestionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOrchestrator")
            .field("opts", &self.opts)
            .field("state", &self.state())
            .finish()
    }
}

impl Default for IngestionOrchestrator {
    fn default() -> Self {
        Self::new(DashboardOptions::default())
    }
}

impl IngestionOrchestrator {
    pub fn new(opts: DashboardOptions) -> Self {
        Self {
            opts,
            state: Mutex::new(DashboardState::new()),
        }
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.opts
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.lock().snapshot()
    }

    pub fn state(&self) -> LoadState {
        self.lock().load_state
    }

    pub fn is_loading(&self) -> bool {
        self.state() == LoadState::Loading
    }

    /// Displayed summary, if any.
    pub fn summary(&self) -> Option<Summary> {
        self.lock().summary.clone()
    }

    /// Records of the last successful ingestion.
    pub fn records(&self) -> Vec<EquipmentRecord> {
        self.lock().records.clone()
    }

    /// History entries, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock().ledger.entries().to_vec()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Ingest rows that were already decoded elsewhere (e.g. from a remote response).
    pub fn submit_rows(&self, label: impl Into<String>, rows: Vec<RawRow>) -> IngestionResult<Summary> {
        self.submit_with(label, move || Ok(rows))
    }

    /// Ingest rows produced by `loader`.
    ///
    /// `loader` is the single blocking fetch step (file read, network call). It runs while the
    /// orchestrator is `Loading` but without the state lock held. Its error fails the submission.
    pub fn submit_with<F>(&self, label: impl Into<String>, loader: F) -> IngestionResult<Summary>
    where
        F: FnOnce() -> IngestionResult<Vec<RawRow>>,
    {
        let ctx = IngestionContext {
            source_label: label.into(),
            format: None,
        };
        self.run(ctx, || Ok(Payload::Rows { rows: loader()?, raw: None }))
    }

    /// Ingest a CSV body (header row + comma-delimited rows).
    pub fn submit_csv(&self, label: impl Into<String>, bytes: &[u8]) -> IngestionResult<Summary> {
        let ctx = IngestionContext {
            source_label: label.into(),
            format: Some(IngestionFormat::Csv),
        };
        self.run(ctx, || {
            Ok(Payload::Rows {
                rows: read_csv_rows_from_bytes(bytes)?,
                raw: Some(bytes.to_vec()),
            })
        })
    }

    /// Ingest JSON text (array of objects, single object, or NDJSON).
    pub fn submit_json(&self, label: impl Into<String>, text: &str) -> IngestionResult<Summary> {
        let ctx = IngestionContext {
            source_label: label.into(),
            format: Some(IngestionFormat::Json),
        };
        self.run(ctx, || {
            Ok(Payload::Rows {
                rows: read_json_rows(text)?,
                raw: None,
            })
        })
    }

    /// Ingest a file; the format is inferred from its extension and the file name becomes the
    /// history label.
    pub fn submit_path(&self, path: impl AsRef<Path>) -> IngestionResult<Summary> {
        let path = path.as_ref();
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let format = IngestionFormat::infer(path);
        let ctx = IngestionContext {
            source_label: label,
            format: format.as_ref().ok().copied(),
        };

        self.run(ctx, move || match format? {
            IngestionFormat::Csv => {
                let bytes = fs::read(path)?;
                Ok(Payload::Rows {
                    rows: read_csv_rows_from_bytes(&bytes)?,
                    raw: Some(bytes),
                })
            }
            other => Ok(Payload::Rows {
                rows: read_rows_from_path(path, Some(other))?,
                raw: None,
            }),
        })
    }

    /// Ingest a freshly generated sample batch.
    pub fn load_sample(&self) -> IngestionResult<Summary> {
        let ctx = IngestionContext {
            source_label: self.opts.sample_label.clone(),
            format: None,
        };
        self.run(ctx, || Ok(Payload::Records(generate_sample())))
    }

    /// Display the summary stored in history entry `id`.
    ///
    /// The record set is not restored; only the displayed summary changes. A miss returns
    /// [`IngestionError::HistoryNotFound`] and leaves every piece of state untouched. Selecting
    /// never modifies the ledger.
    pub fn select_history(&self, id: &str) -> IngestionResult<Summary> {
        let (summary, change) = {
            let mut st = self.lock();
            if st.load_state == LoadState::Loading {
                return Err(IngestionError::Busy);
            }
            let Some(summary) = st.ledger.find(id).cloned() else {
                tracing::debug!(id, "history entry not found; selection ignored");
                return Err(IngestionError::HistoryNotFound { id: id.to_string() });
            };
            st.summary = Some(summary.clone());
            st.error = None;
            (summary, st.transition(LoadState::Ready))
        };
        self.notify(change);
        Ok(summary)
    }

    /// Wipe current records, summary and error; the ledger follows [`DashboardOptions::clear_policy`].
    pub fn clear(&self) -> IngestionResult<()> {
        let change = {
            let mut st = self.lock();
            if st.load_state == LoadState::Loading {
                return Err(IngestionError::Busy);
            }
            st.records.clear();
            st.summary = None;
            st.error = None;
            if self.opts.clear_policy == ClearPolicy::ClearHistory {
                st.ledger.clear();
            }
            st.transition(LoadState::Idle)
        };
        self.notify(change);
        Ok(())
    }

    fn run<F>(&self, ctx: IngestionContext, load: F) -> IngestionResult<Summary>
    where
        F: FnOnce() -> IngestionResult<Payload>,
    {
        let in_flight = self.begin(&ctx)?;
        let result = load().and_then(|payload| self.process(&ctx.source_label, payload));
        in_flight.disarm();

        match result {
            Ok(outcome) => {
                let summary = outcome.summary.clone();
                let stats = IngestionStats {
                    rows_read: outcome.rows_read,
                    records: outcome.records.len(),
                };
                let change = {
                    let mut st = self.lock();
                    match outcome.remote_history {
                        Some(history) => st.ledger.replace_all(history),
                        None => st.ledger.record(HistoryEntry::new(
                            ctx.source_label.clone(),
                            outcome.records.len(),
                            summary.clone(),
                        )),
                    }
                    st.records = outcome.records;
                    st.summary = Some(summary.clone());
                    st.error = None;
                    st.transition(LoadState::Ready)
                };
                self.notify(change);
                if let Some(obs) = self.opts.observer.as_ref() {
                    obs.on_success(&ctx, stats);
                }
                Ok(summary)
            }
            Err(e) => {
                self.fail(e.to_string());
                self.report_failure(&ctx, &e);
                Err(e)
            }
        }
    }

    fn process(&self, label: &str, payload: Payload) -> IngestionResult<Outcome> {
        let (records, rows_read, raw) = match payload {
            Payload::Rows { rows, raw } => (normalize_rows(&rows), rows.len(), raw),
            Payload::Records(records) => {
                let n = records.len();
                (records, n, None)
            }
        };

        match (&self.opts.summary_source, raw) {
            (SummarySource::Remote(remote), Some(bytes)) => {
                let ack = remote.upload(label, &bytes)?;
                tracing::debug!(id = %ack.id, records = ack.record_count, "upload acknowledged");
                let summary = match ack.summary {
                    Some(s) => s,
                    None => remote.fetch_summary()?,
                };
                let mut history = remote.fetch_history()?;
                if !history.iter().any(|entry| entry.id() == ack.id) {
                    tracing::warn!(id = %ack.id, "server history omits the acknowledged upload");
                    history.insert(
                        0,
                        HistoryEntry::from_parts(
                            ack.id,
                            ack.file_name,
                            ack.uploaded_at,
                            ack.record_count,
                            summary.clone(),
                        ),
                    );
                }
                Ok(Outcome {
                    records,
                    summary,
                    rows_read,
                    remote_history: Some(history),
                })
            }
            _ => {
                let summary = summarize(&records);
                Ok(Outcome {
                    records,
                    summary,
                    rows_read,
                    remote_history: None,
                })
            }
        }
    }

    fn begin(&self, ctx: &IngestionContext) -> IngestionResult<InFlight<'_>> {
        let change = {
            let mut st = self.lock();
            if st.load_state == LoadState::Loading {
                tracing::debug!(source = %ctx.source_label, "rejecting submission: ingestion already in progress");
                return Err(IngestionError::Busy);
            }
            st.error = None;
            st.transition(LoadState::Loading)
        };
        self.notify(change);
        Ok(InFlight {
            orchestrator: self,
            armed: true,
        })
    }

    fn fail(&self, message: String) {
        let change = {
            let mut st = self.lock();
            st.error = Some(message);
            st.transition(LoadState::Failed)
        };
        self.notify(change);
    }

    fn report_failure(&self, ctx: &IngestionContext, e: &IngestionError) {
        if let Some(obs) = self.opts.observer.as_ref() {
            let sev = severity_for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= self.opts.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }

    fn notify(&self, (from, to): (LoadState, LoadState)) {
        if let Some(obs) = self.opts.observer.as_ref() {
            obs.on_state_change(from, to);
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks an ingestion in flight. If dropped while armed (the loader panicked), the orchestrator
/// is moved to `Failed` so it does not stay `Loading` forever.
struct InFlight<'a> {
    orchestrator: &'a IngestionOrchestrator,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.fail("ingestion aborted".to_string());
        }
    }
}
