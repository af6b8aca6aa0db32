//! `equipment-data-pipeline` ingests tables of equipment parameters (flowrate, pressure,
//! temperature per named piece of equipment), normalizes them into canonical
//! [`types::EquipmentRecord`]s, computes a deterministic [`types::Summary`], and keeps a bounded,
//! newest-first [`history::HistoryLedger`] of past ingestions.
//!
//! The primary entrypoint is [`orchestrator::IngestionOrchestrator`], which drives the whole
//! pipeline and owns the state a dashboard renders. The individual stages are also usable on
//! their own.
//!
//! ## What you can ingest
//!
//! - **CSV** (`.csv`): header row + comma-delimited rows
//! - **JSON** (`.json`, `.ndjson`): array of objects, a single object, or newline-delimited
//!   objects; also rows already decoded from a remote response
//! - **Excel/workbooks** (requires the Cargo feature `excel`): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`,
//!   `.ods`
//!
//! Column names are matched tolerantly: `Equipment Name`, `equipment_name` and `EquipmentName`
//! all resolve to the equipment name (see [`ingestion::CanonicalField`]). Rows without a name are
//! dropped; numeric cells that do not parse become `0.0`.
//!
//! ## Quick example: the orchestrator
//!
//! ```rust
//! use equipment_data_pipeline::orchestrator::{IngestionOrchestrator, LoadState};
//!
//! let dashboard = IngestionOrchestrator::default();
//! let csv = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
//!             Pump A,Pump,100,5,20\n\
//!             ,Pump,50,1,1\n";
//! let summary = dashboard.submit_csv("plant.csv", csv).unwrap();
//! assert_eq!(summary.total_count, 1);
//! assert_eq!(summary.avg_flowrate, 100.0);
//!
//! // A malformed upload fails without losing what is displayed.
//! assert!(dashboard.submit_csv("broken.csv", b"a,b\n1,2,3\n").is_err());
//! let snap = dashboard.snapshot();
//! assert_eq!(snap.state, LoadState::Failed);
//! assert_eq!(snap.summary, Some(summary));
//! ```
//!
//! ## Quick example: the stages by hand
//!
//! ```rust
//! use equipment_data_pipeline::ingestion::csv::read_csv_rows_from_bytes;
//! use equipment_data_pipeline::ingestion::normalize_rows;
//! use equipment_data_pipeline::processing::summarize;
//!
//! # fn main() -> Result<(), equipment_data_pipeline::IngestionError> {
//! let rows = read_csv_rows_from_bytes(b"equipment_name,type,flowrate\nR-1,Reactor,abc\n")?;
//! let records = normalize_rows(&rows);
//! assert_eq!(records[0].id, "eq-1");
//! assert_eq!(records[0].flowrate, 0.0);
//! assert_eq!(summarize(&records).type_distribution["Reactor"], 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: table readers, the record normalizer, observability hooks
//! - [`processing`]: summary aggregation and the sample generator
//! - [`history`]: the bounded history ledger
//! - [`orchestrator`]: the dashboard state machine
//! - [`remote`]: the boundary to an optional remote service
//! - [`types`]: raw rows, records, summaries
//! - [`error`]: error types

pub mod error;
pub mod history;
pub mod ingestion;
pub mod orchestrator;
pub mod processing;
pub mod remote;
pub mod types;

pub use error::{IngestionError, IngestionResult};
