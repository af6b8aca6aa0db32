//! In-memory computations over normalized records.
//!
//! - [`summarize()`]: count, per-metric mean/min/max, type distribution
//! - [`sample`]: synthetic demo records
//!
//! ## Example: normalize → summarize
//!
//! ```rust
//! use equipment_data_pipeline::ingestion::normalize_rows;
//! use equipment_data_pipeline::processing::summarize;
//! use equipment_data_pipeline::types::RawRow;
//!
//! let rows = vec![
//!     RawRow::new()
//!         .with("Equipment Name", "Pump A")
//!         .with("Type", "Pump")
//!         .with("Flowrate", "100"),
//!     RawRow::new().with("Equipment Name", "").with("Flowrate", "50"),
//! ];
//! let records = normalize_rows(&rows);
//! let summary = summarize(&records);
//! assert_eq!(summary.total_count, 1);
//! assert_eq!(summary.avg_flowrate, 100.0);
//! ```

pub mod sample;
pub mod summary;

pub use sample::{generate_sample, generate_sample_with, SAMPLE_LABEL, SAMPLE_SIZE};
pub use summary::summarize;
