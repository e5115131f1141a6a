//! `dashboard-data` turns an uploaded CSV or Excel file into an in-memory [`types::Table`], derives
//! per-column filter options, and evaluates equality filters over the rows.
//!
//! The primary entrypoint is [`session::DashboardSession`], which owns the loaded table and the
//! current [`filtering::FilterSelection`]. Parsing alone is available through
//! [`ingestion::ingest_upload`].
//!
//! ## What you can upload
//!
//! **File kinds (selected by extension):**
//!
//! - **Delimited text**: `.csv`
//! - **Excel workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, first sheet only
//!
//! **Cell values:**
//!
//! Every cell is a [`types::CellValue`]: [`types::CellValue::Number`] or
//! [`types::CellValue::Text`]. CSV fields are trimmed and coerced with [`types::coerce`]; an empty
//! field stays `Text("")`. Spreadsheet cells keep the type the workbook gives them.
//!
//! ## Quick example
//!
//! ```rust
//! use dashboard_data::config::SessionConfig;
//! use dashboard_data::identity::StaticIdentity;
//! use dashboard_data::ingestion::ParseOptions;
//! use dashboard_data::session::DashboardSession;
//! use dashboard_data::store::{Collection, MemoryRecordStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryRecordStore::new();
//! let identity = StaticIdentity::signed_in("user-1");
//!
//! let mut session = DashboardSession::new(SessionConfig::with_filter_columns(["Country"]));
//! let upload = session.upload(
//!     "staff.csv",
//!     b"Name,Country\nAlice,US\nBob,\n\nCara,UK\n",
//!     &ParseOptions::default(),
//! )?;
//! if let Err(e) = upload.persist(&store, &identity) {
//!     session.record_persistence_failure(&e);
//! }
//! assert_eq!(store.len(Collection::DashboardData), 1);
//!
//! let countries: Vec<&str> = session.filter_options().get("Country").unwrap().labels().collect();
//! assert_eq!(countries, vec!["UK", "US"]);
//!
//! session.set_filter("Country", "UK");
//! let rows = session.filtered_rows();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].get("Name").unwrap().to_string(), "Cara");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified ingestion entrypoints and format-specific implementations
//! - [`types`]: table, row and cell types, plus numeric coercion
//! - [`filtering`]: filter options and the equality predicate
//! - [`session`]: the per-user session state
//! - [`store`], [`services`], [`identity`]: record store, saved configs/views, current user
//! - [`config`]: session configuration
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod filtering;
pub mod identity;
pub mod ingestion;
pub mod services;
pub mod session;
pub mod store;
pub mod types;

pub use error::{IdentityError, IngestionError, IngestionResult, PersistenceError, PersistenceResult};
