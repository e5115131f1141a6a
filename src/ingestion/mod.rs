//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_upload`] (from [`unified`]) which:
//!
//! - picks the file kind from the file extension (or you can override via [`ParseOptions`])
//! - parses the content into an in-memory [`crate::types::Table`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, LogObserver,
};
pub use unified::{FileKind, ParseOptions, ingest_from_path, ingest_upload, parse_bytes, severity_for_error};
