//! Dataset session state.
//!
//! A [`DashboardSession`] owns the currently loaded [`Table`] and the [`FilterSelection`], and keeps
//! the derived views (filter options, visible rows) in sync with them. Sessions are plain values:
//! create as many as needed.
//!
//! ```
//! use dashboard_data::config::SessionConfig;
//! use dashboard_data::ingestion::ParseOptions;
//! use dashboard_data::session::DashboardSession;
//!
//! # fn main() -> Result<(), dashboard_data::IngestionError> {
//! let mut session = DashboardSession::new(SessionConfig::with_filter_columns(["Country"]));
//! let upload = session.upload(
//!     "staff.csv",
//!     b"Name,Country\nAlice,US\nBob,\n\nCara,UK\n",
//!     &ParseOptions::default(),
//! )?;
//! // Persisting is up to the caller; dropping the upload skips it.
//! drop(upload);
//!
//! session.set_filter("Country", "UK");
//! assert_eq!(session.filtered_count(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::config::SessionConfig;
use crate::error::{IngestionResult, PersistenceError, PersistenceResult};
use crate::filtering::{FilterOptions, FilterSelection, derive_options, matching_indices};
use crate::identity::Identity;
use crate::ingestion::{ParseOptions, ingest_upload};
use crate::store::{Collection, RecordId, RecordStore};
use crate::types::{Row, Table};

/// Snapshot of a freshly loaded table, waiting to be written to the record store.
///
/// Returned by [`DashboardSession::load`]. Persisting is optional and never affects the session:
/// a failed write leaves the loaded table in place.
#[must_use = "call `persist` to store the upload, or drop it to skip persistence"]
#[derive(Debug, Clone)]
pub struct PendingUpload {
    table: Arc<Table>,
}

#[derive(Serialize)]
struct UploadPayload<'a> {
    data: &'a [Row],
    headers: &'a [String],
    user_id: Option<String>,
}

impl PendingUpload {
    /// The table this upload captured.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Insert `{data, headers, user_id}` into the `dashboard_data` collection.
    pub fn persist(&self, store: &dyn RecordStore, identity: &dyn Identity) -> PersistenceResult<RecordId> {
        let payload = serde_json::to_value(UploadPayload {
            data: &self.table.rows,
            headers: &self.table.headers,
            user_id: identity.current_user_id(),
        })?;

        match store.insert(Collection::DashboardData, payload) {
            Ok(record) => {
                log::debug!(
                    "stored upload as {} record {} ({} rows)",
                    Collection::DashboardData,
                    record.id,
                    self.table.row_count()
                );
                Ok(record.id)
            }
            Err(e) => {
                log::warn!("failed to store upload ({} rows): {e}", self.table.row_count());
                Err(e)
            }
        }
    }
}

/// Summary of a session, for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    /// Rows in the loaded table.
    pub rows: usize,
    /// Rows passing the current selection.
    pub filtered_rows: usize,
    /// Headers in the loaded table.
    pub columns: usize,
    /// Most recent failure (upload rejected, parse error, or store warning).
    pub last_error: Option<String>,
}

/// The current table, its filter selection, and the views derived from them.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    config: SessionConfig,
    table: Arc<Table>,
    selection: FilterSelection,
    options: FilterOptions,
    visible: Vec<usize>,
    last_error: Option<String>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl DashboardSession {
    /// Create a session with no table loaded.
    pub fn new(config: SessionConfig) -> Self {
        let table = Arc::new(Table::default());
        let options = derive_options(&table, &config.filter_columns);
        Self {
            config,
            table,
            selection: FilterSelection::new(),
            options,
            visible: Vec::new(),
            last_error: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the table and clear every filter.
    ///
    /// Options and the visible rows are recomputed before this returns.
    pub fn load(&mut self, table: Table) -> PendingUpload {
        let table = Arc::new(table);
        self.options = derive_options(&table, &self.config.filter_columns);
        self.selection.clear();
        self.visible = (0..table.row_count()).collect();
        self.table = Arc::clone(&table);
        self.last_error = None;

        log::info!(
            "loaded table: {} rows, {} columns",
            table.row_count(),
            table.column_count()
        );
        PendingUpload { table }
    }

    /// Parse an uploaded file and [`load`](Self::load) it.
    ///
    /// On failure nothing changes except [`Self::last_error`].
    pub fn upload(&mut self, file_name: &str, bytes: &[u8], options: &ParseOptions) -> IngestionResult<PendingUpload> {
        match ingest_upload(file_name, bytes, options) {
            Ok(table) => Ok(self.load(table)),
            Err(e) => {
                log::warn!("upload of {file_name} rejected: {e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Set the selected value for `column`; an empty `value` removes that constraint.
    pub fn set_filter(&mut self, column: &str, value: &str) {
        self.selection.set(column, value);
        log::debug!("filter {column:?} = {value:?}");
        self.refilter();
    }

    /// Replace the whole selection, e.g. when restoring a saved view.
    pub fn apply_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.refilter();
    }

    /// Remove every constraint.
    pub fn clear_filters(&mut self) {
        self.selection.clear();
        self.refilter();
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    fn refilter(&mut self) {
        self.visible = matching_indices(&self.table, &self.selection);
    }

    /// Rows passing the current selection, in table order.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        self.visible.iter().map(|&i| &self.table.rows[i]).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.visible.len()
    }

    /// Options for each designated filter column, drawn from the whole table.
    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Keep a store failure visible as a warning; the loaded table is unaffected.
    pub fn record_persistence_failure(&mut self, error: &PersistenceError) {
        self.last_error = Some(format!("upload loaded but not saved: {error}"));
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            rows: self.row_count(),
            filtered_rows: self.filtered_count(),
            columns: self.table.column_count(),
            last_error: self.last_error.clone(),
        }
    }
}
