//! Error types for the reconciliation engine

use std::path::PathBuf;

use campus_sheets_xlsx::XlsxError;
use thiserror::Error;

/// Result type alias using [`ReconcileError`]
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;

/// Fatal errors: any of these aborts the workflow
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The source workbook does not exist
    #[error("Spreadsheet not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The source exists but is not a readable workbook
    #[error("Cannot read workbook {origin}: {source}")]
    UnreadableWorkbook {
        origin: String,
        #[source]
        source: XlsxError,
    },

    /// The output workbook could not be saved
    #[error("Cannot write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    /// Options that cannot describe a sheet layout
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Spreadsheet model error while building the output sheet
    #[error("Sheet error: {0}")]
    Sheet(#[from] campus_sheets_core::Error),
}

/// A candidate payload that is not `{"colleges": [...]}`
///
/// Recoverable: callers treat it as an empty candidate set.
#[derive(Debug, Error)]
pub enum CandidatePayloadError {
    /// Not JSON at all
    #[error("Invalid candidate payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// JSON, but not an object at the top level
    #[error("Invalid candidate payload: expected an object, found {0}")]
    NotAnObject(&'static str),

    /// The `colleges` key holds something other than a list
    #[error("Invalid candidate payload: \"colleges\" must be a list, found {0}")]
    NotAList(&'static str),
}

/// Failures of the name-normalization oracle
///
/// Recoverable: the reconciler falls back to the raw candidate names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The oracle could not be reached or refused the request
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    /// The oracle answered with something that is not a candidate payload
    #[error("Oracle response unparsable: {0}")]
    Unparsable(String),
}
