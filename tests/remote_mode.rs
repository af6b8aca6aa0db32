use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use equipment_data_pipeline::history::HistoryEntry;
use equipment_data_pipeline::orchestrator::{DashboardOptions, IngestionOrchestrator, LoadState, SummarySource};
use equipment_data_pipeline::remote::{RemoteBoundary, TransportError, UploadAck};
use equipment_data_pipeline::types::{RawRow, Summary};
use equipment_data_pipeline::IngestionError;

const CSV: &[u8] = b"Equipment Name,Type,Flowrate,Pressure,Temperature\nPump A,Pump,100,5,20\n";

struct FakeBackend {
    ack_summary: Option<Summary>,
    server_summary: Summary,
    history: Vec<HistoryEntry>,
    upload_error: Option<TransportError>,
    uploads: Mutex<Vec<(String, usize)>>,
}

impl FakeBackend {
    fn new() -> Self {
        let mut server_summary = Summary::empty();
        server_summary.total_count = 42;
        Self {
            ack_summary: None,
            server_summary,
            history: (1..=7)
                .map(|i| {
                    HistoryEntry::from_parts(
                        i.to_string(),
                        format!("server{i}.csv"),
                        Utc.with_ymd_and_hms(2026, 1, i, 0, 0, 0).unwrap(),
                        i as usize,
                        Summary::empty(),
                    )
                })
                .collect(),
            upload_error: None,
            uploads: Mutex::new(Vec::new()),
        }
    }
}

impl RemoteBoundary for FakeBackend {
    fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<UploadAck, TransportError> {
        if let Some(err) = &self.upload_error {
            return Err(err.clone());
        }
        self.uploads.lock().unwrap().push((file_name.to_string(), bytes.len()));
        Ok(UploadAck {
            id: "99".to_string(),
            file_name: file_name.to_string(),
            record_count: 1,
            uploaded_at: Utc::now(),
            summary: self.ack_summary.clone(),
        })
    }

    fn fetch_summary(&self) -> Result<Summary, TransportError> {
        Ok(self.server_summary.clone())
    }

    fn fetch_history(&self) -> Result<Vec<HistoryEntry>, TransportError> {
        Ok(self.history.clone())
    }
}

fn remote_dashboard(backend: Arc<FakeBackend>) -> IngestionOrchestrator {
    IngestionOrchestrator::new(DashboardOptions {
        summary_source: SummarySource::Remote(backend),
        ..Default::default()
    })
}

#[test]
fn server_summary_and_history_are_preferred() {
    let mut backend = FakeBackend::new();
    backend.history[0] = HistoryEntry::from_parts(
        "99",
        "plant.csv",
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
        1,
        Summary::empty(),
    );
    let backend = Arc::new(backend);
    let dash = remote_dashboard(backend.clone());

    let summary = dash.submit_csv("plant.csv", CSV).unwrap();
    assert_eq!(summary.total_count, 42);

    let snap = dash.snapshot();
    assert_eq!(snap.state, LoadState::Ready);
    assert_eq!(snap.records.len(), 1);
    assert_eq!(snap.history.len(), 5);
    assert_eq!(snap.history[0].id(), "99");
    assert_eq!(snap.history[1].source_label(), "server2.csv");
    assert_eq!(*backend.uploads.lock().unwrap(), vec![("plant.csv".to_string(), CSV.len())]);
}

#[test]
fn acknowledged_upload_missing_from_listing_is_recorded() {
    let dash = remote_dashboard(Arc::new(FakeBackend::new()));
    dash.submit_csv("plant.csv", CSV).unwrap();

    let history = dash.history();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].id(), "99");
    assert_eq!(history[0].source_label(), "plant.csv");
    assert_eq!(history[0].record_count(), 1);
    assert_eq!(history[0].summary().total_count, 42);
    assert_eq!(history[1].source_label(), "server1.csv");

    let id = history[0].id().to_string();
    assert_eq!(dash.select_history(&id).unwrap().total_count, 42);
}

#[test]
fn ack_summary_skips_the_summary_fetch() {
    let mut backend = FakeBackend::new();
    let mut ack = Summary::empty();
    ack.total_count = 7;
    backend.ack_summary = Some(ack);
    let dash = remote_dashboard(Arc::new(backend));

    assert_eq!(dash.submit_csv("plant.csv", CSV).unwrap().total_count, 7);
}

#[test]
fn malformed_csv_is_never_uploaded() {
    let backend = Arc::new(FakeBackend::new());
    let dash = remote_dashboard(backend.clone());

    assert!(dash.submit_csv("bad.csv", b"a,b\n1,2,3\n").is_err());
    assert!(backend.uploads.lock().unwrap().is_empty());
}

#[test]
fn transport_failure_surfaces_cause_and_keeps_previous_state() {
    let mut backend = FakeBackend::new();
    backend.upload_error = Some(TransportError::NoResponse("connection refused".to_string()));
    let dash = remote_dashboard(Arc::new(backend));

    // Pre-parsed rows never touch the remote service.
    let local = dash
        .submit_rows("local", vec![RawRow::new().with("Equipment Name", "X")])
        .unwrap();
    assert_eq!(local.total_count, 1);

    let err = dash.submit_csv("plant.csv", CSV).unwrap_err();
    assert!(matches!(err, IngestionError::Transport(TransportError::NoResponse(_))));

    let snap = dash.snapshot();
    assert_eq!(snap.state, LoadState::Failed);
    assert_eq!(snap.error.as_deref(), Some("no response from server: connection refused"));
    assert_eq!(snap.summary, Some(local));
    assert_eq!(snap.history.len(), 1);
}
