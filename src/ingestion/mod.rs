//! Ingestion: raw table readers and the record normalizer.
//!
//! Reading and normalizing are separate steps:
//!
//! - the readers ([`csv`], [`json`], and `excel` behind the `excel` feature) turn a byte stream
//!   or file into [`crate::types::RawRow`]s, failing the whole call if the input is not tabular;
//! - [`normalize::normalize_rows`] turns raw rows into canonical
//!   [`crate::types::EquipmentRecord`]s and never fails.
//!
//! [`read_rows_from_path`] (from [`unified`]) picks the reader from the file extension.
//! Outcomes can be reported to an [`IngestionObserver`].

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod normalize;
pub mod observability;
pub mod unified;

pub use normalize::{normalize_rows, CanonicalField};
pub use observability::{
    severity_for_error, CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity,
    IngestionStats, TracingObserver,
};
pub use unified::{read_rows_from_path, IngestionFormat};
