//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_upload`] (bytes + original file name) or [`ingest_from_path`].
//!
//! - If [`ParseOptions::format`] is `None`, the file kind is inferred from the file extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Table;

use super::csv::{self, DEFAULT_DELIMITER};
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Supported upload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Delimited text (`.csv`).
    Delimited,
    /// Spreadsheet workbook (`.xlsx`, `.xls`; feature-gated behind `excel`).
    Spreadsheet,
}

impl FileKind {
    /// Parse a file kind from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Delimited),
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Infer the file kind from a file name or path.
    ///
    /// The extension is the text after the last `.` of the final path component, so a bare
    /// `.csv` counts as delimited. Returns [`IngestionError::UnsupportedFormat`] when the
    /// extension is missing or unknown.
    pub fn from_file_name(name: impl AsRef<Path>) -> IngestionResult<Self> {
        let ext = name
            .as_ref()
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|s| s.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .unwrap_or_default();

        Self::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
            extension: ext.to_string(),
        })
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ParseOptions {
    /// If `None`, infer the kind from the file extension.
    pub format: Option<FileKind>,
    /// Field delimiter for delimited text.
    pub delimiter: u8,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("format", &self.format)
            .field("delimiter", &(self.delimiter as char))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            format: None,
            delimiter: DEFAULT_DELIMITER,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Parse in-memory file content of a known kind into a [`Table`].
///
/// No observer is notified; see [`ingest_upload`] for the reporting entrypoint.
pub fn parse_bytes(bytes: &[u8], kind: FileKind, options: &ParseOptions) -> IngestionResult<Table> {
    match kind {
        FileKind::Delimited => csv::ingest_csv_from_bytes(bytes, options.delimiter),
        FileKind::Spreadsheet => parse_spreadsheet_bytes(bytes),
    }
}

/// Parse an uploaded file.
///
/// `file_name` selects the file kind (unless `options.format` is set) and labels observer events.
///
/// ```
/// use dashboard_data::ingestion::{ingest_upload, ParseOptions};
/// use dashboard_data::types::CellValue;
///
/// # fn main() -> Result<(), dashboard_data::IngestionError> {
/// let table = ingest_upload("staff.csv", b"Name,Country\nAlice,US\n", &ParseOptions::default())?;
/// assert_eq!(table.headers, vec!["Name", "Country"]);
/// assert_eq!(table.rows[0].get("Country"), Some(&CellValue::text("US")));
/// # Ok(())
/// # }
/// ```
pub fn ingest_upload(file_name: &str, bytes: &[u8], options: &ParseOptions) -> IngestionResult<Table> {
    run_observed(file_name.to_string(), Path::new(file_name), options, |kind| {
        parse_bytes(bytes, kind, options)
    })
}

/// Read and parse a file from disk.
///
/// ```no_run
/// use dashboard_data::ingestion::{ingest_from_path, ParseOptions};
///
/// # fn main() -> Result<(), dashboard_data::IngestionError> {
/// let table = ingest_from_path("headcount.xlsx", &ParseOptions::default())?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &ParseOptions) -> IngestionResult<Table> {
    let path = path.as_ref();
    run_observed(path.display().to_string(), path, options, |kind| match kind {
        FileKind::Delimited => csv::ingest_csv_from_path(path, options.delimiter),
        FileKind::Spreadsheet => parse_spreadsheet_path(path),
    })
}

fn run_observed<F>(source: String, name: &Path, options: &ParseOptions, parse: F) -> IngestionResult<Table>
where
    F: FnOnce(FileKind) -> IngestionResult<Table>,
{
    let kind = match options.format {
        Some(k) => Ok(k),
        None => FileKind::from_file_name(name),
    };

    let ctx = IngestionContext {
        source,
        format: kind.as_ref().ok().copied(),
    };
    let result = kind.and_then(parse);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(table) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: table.row_count(),
                    columns: table.column_count(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

/// Severity the observers see for a failed ingestion.
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        #[cfg(feature = "excel")]
        IngestionError::Excel(err) => match err {
            calamine::Error::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        IngestionError::Parse { .. } => IngestionSeverity::Error,
        IngestionError::UnsupportedFormat { .. } => IngestionSeverity::Warning,
        IngestionError::FeatureDisabled { .. } => IngestionSeverity::Error,
    }
}

#[cfg(feature = "excel")]
fn parse_spreadsheet_bytes(bytes: &[u8]) -> IngestionResult<Table> {
    super::excel::ingest_excel_from_bytes(bytes)
}

#[cfg(feature = "excel")]
fn parse_spreadsheet_path(path: &Path) -> IngestionResult<Table> {
    super::excel::ingest_excel_from_path(path)
}

#[cfg(not(feature = "excel"))]
fn parse_spreadsheet_bytes(_bytes: &[u8]) -> IngestionResult<Table> {
    Err(IngestionError::FeatureDisabled { feature: "excel" })
}

#[cfg(not(feature = "excel"))]
fn parse_spreadsheet_path(_path: &Path) -> IngestionResult<Table> {
    Err(IngestionError::FeatureDisabled { feature: "excel" })
}
