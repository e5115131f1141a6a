use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for record-store operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Error type returned by parsing/ingestion functions.
///
/// Every variant leaves the caller in a retryable state: no table is produced and any table
/// already installed in a [`crate::session::DashboardSession`] is left untouched.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet decoding error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Delimited-text decoding error (including invalid UTF-8).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The file kind could not be determined or is not one of the supported kinds.
    #[error("unsupported file format '{extension}': upload a .csv, .xlsx or .xls file")]
    UnsupportedFormat { extension: String },

    /// The content was readable but could not be turned into a table.
    #[error("failed to parse file: {message}")]
    Parse { message: String },

    /// The format is known but support for it was not compiled in.
    #[error("{feature} ingestion not enabled (enable cargo feature '{feature}')")]
    FeatureDisabled { feature: &'static str },
}

/// Error type returned by [`crate::store::RecordStore`] implementations.
///
/// Persistence failures are non-fatal: the in-memory table stays installed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying I/O error of a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A payload could not be encoded, or a stored record could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the write.
    #[error("record store rejected write to '{collection}': {message}")]
    Rejected { collection: String, message: String },
}

/// Error type returned by [`crate::identity::Identity`] implementations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity provider failed to complete the request.
    #[error("identity provider error: {message}")]
    Provider { message: String },
}
