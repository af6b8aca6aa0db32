use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::error::IngestionError;
use crate::orchestrator::LoadState;
use crate::remote::TransportError;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (I/O failures, unreachable remote service).
    Critical,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionContext {
    /// File name or synthetic label of the input.
    pub source_label: String,
    /// Input format, when the input was a byte stream or file.
    pub format: Option<IngestionFormat>,
}

/// Stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Raw rows read from the input.
    pub rows_read: usize,
    /// Records kept after normalization.
    pub records: usize,
}

impl IngestionStats {
    /// Rows dropped for lacking an equipment name.
    pub fn rows_skipped(&self) -> usize {
        self.rows_read.saturating_sub(self.records)
    }
}

/// Observer interface for ingestion outcomes and orchestrator state changes.
///
/// Implementors can record metrics, logs, or trigger alerts. Callbacks are invoked without any
/// orchestrator lock held, so an observer may read the orchestrator's snapshot.
pub trait IngestionObserver: Send + Sync {
    /// Called when an ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when an ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called on every orchestrator state transition.
    fn on_state_change(&self, _from: LoadState, _to: LoadState) {}
}

/// Map an error to the severity used for observer callbacks.
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Transport(TransportError::NoResponse(_)) => IngestionSeverity::Critical,
        IngestionError::Transport(_) => IngestionSeverity::Error,
        IngestionError::Json(_) | IngestionError::Parse { .. } | IngestionError::UnsupportedFormat { .. } => {
            IngestionSeverity::Error
        }
        #[cfg(feature = "excel")]
        IngestionError::Excel(_) => IngestionSeverity::Error,
        IngestionError::Busy => IngestionSeverity::Warning,
        IngestionError::HistoryNotFound { .. } => IngestionSeverity::Info,
    }
}

/// Forwards every callback to each observer in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }

    fn each(&self, f: impl Fn(&dyn IngestionObserver)) {
        self.observers.iter().for_each(|o| f(o.as_ref()));
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.each(|o| o.on_alert(ctx, severity, error));
    }

    fn on_state_change(&self, from: LoadState, to: LoadState) {
        self.each(|o| o.on_state_change(from, to));
    }
}

/// Emits ingestion events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(
            source = %ctx.source_label,
            format = ?ctx.format,
            rows = stats.rows_read,
            records = stats.records,
            skipped = stats.rows_skipped(),
            "ingestion succeeded"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::warn!(
            source = %ctx.source_label,
            format = ?ctx.format,
            ?severity,
            %error,
            "ingestion failed"
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(
            source = %ctx.source_label,
            format = ?ctx.format,
            ?severity,
            %error,
            "ingestion alert"
        );
    }

    fn on_state_change(&self, from: LoadState, to: LoadState) {
        tracing::debug!(?from, ?to, "dashboard state changed");
    }
}

/// A single observer callback rendered as one log line.
enum EventLine<'a> {
    Success(&'a IngestionContext, IngestionStats),
    Failure {
        ctx: &'a IngestionContext,
        severity: IngestionSeverity,
        error: &'a IngestionError,
        alert: bool,
    },
    StateChange(LoadState, LoadState),
}

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventLine::Success(ctx, stats) => write!(
                f,
                "ok source={} format={} rows={} records={} skipped={}",
                ctx.source_label,
                format_label(ctx.format),
                stats.rows_read,
                stats.records,
                stats.rows_skipped()
            ),
            EventLine::Failure {
                ctx,
                severity,
                error,
                alert,
            } => write!(
                f,
                "{} severity={severity:?} source={} format={} err={error}",
                if *alert { "ALERT" } else { "fail" },
                ctx.source_label,
                format_label(ctx.format)
            ),
            EventLine::StateChange(from, to) => write!(f, "state {from:?} -> {to:?}"),
        }
    }
}

fn format_label(format: Option<IngestionFormat>) -> &'static str {
    match format {
        Some(IngestionFormat::Csv) => "csv",
        Some(IngestionFormat::Json) => "json",
        Some(IngestionFormat::Excel) => "excel",
        None => "rows",
    }
}

/// Appends one timestamped line per event to a local log file.
///
/// Writes are best-effort: a log file that cannot be opened or written is ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: EventLine<'_>) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {event}", Utc::now().to_rfc3339());
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append(EventLine::Success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append(EventLine::Failure {
            ctx,
            severity,
            error,
            alert: false,
        });
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append(EventLine::Failure {
            ctx,
            severity,
            error,
            alert: true,
        });
    }

    fn on_state_change(&self, from: LoadState, to: LoadState) {
        self.append(EventLine::StateChange(from, to));
    }
}
