//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while ingesting compilation logs
///
/// Every variant is fatal for the whole session: logs are written by a
/// trusted runtime, so anything unexpected is surfaced instead of skipped.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Sequencing error: {0}")]
    SequencingError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Ingestion cancelled")]
    Cancelled,

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<IngestError>,
    },
}

impl IngestError {
    /// Attach the log file being processed to this error
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // Already located, or not file-specific
            IngestError::InFile { .. } | IngestError::Cancelled => self,
            other => IngestError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error without any file location wrapper
    pub fn root(&self) -> &IngestError {
        match self {
            IngestError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Errors that can occur while writing to the columnar store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("DuckDB error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("Row framing error: {0}")]
    Framing(String),

    #[error("Column {table}.{column}: {message}")]
    Column {
        table: &'static str,
        column: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
