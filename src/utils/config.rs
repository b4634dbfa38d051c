//! Configuration and constants for ingestion.

use std::path::PathBuf;

/// Current ingestion report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Only files with this suffix are treated as compilation logs
pub const LOG_FILE_SUFFIX: &str = ".log";

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_DATABASE_FILE: &str = "log.duckdb";

/// Compile tier assumed when a task does not carry a `level` attribute
pub const DEFAULT_COMPILE_LEVEL: u8 = 4;

// Default reserved code cache size (MB) with and without tiered compilation
pub const TIERED_CODE_CACHE_MB: u64 = 240;
pub const NON_TIERED_CODE_CACHE_MB: u64 = 48;
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Failure reason for tasks whose result arrived too late to be correlated.
/// Downstream duration totals usually exclude it.
pub const STALE_TASK_FAILURE: &str = "stale task";

/// Settings for one ingestion session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Directory walked (recursively) for log files
    pub log_dir: PathBuf,

    /// DuckDB file that is dropped and rebuilt by every session
    pub database: PathBuf,

    /// File name suffix identifying log files
    pub suffix: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            database: PathBuf::from(DEFAULT_DATABASE_FILE),
            suffix: LOG_FILE_SUFFIX.to_string(),
        }
    }
}
