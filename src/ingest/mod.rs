//! Log ingestion: extraction state machine, run identity and sessions.
//!
//! This module transforms compilation logs into normalized rows:
//! - Runs, compile threads, compilation tasks and code cache samples
//! - Disambiguated run labels derived from VM flags
//! - Whole-directory sessions with all-or-nothing persistence

pub mod extractor;
pub mod records;
pub mod run_name;
pub mod session;

// Re-export main types and functions
pub use extractor::{extract_log, seconds_to_micros, ElementKind, Extractor, FileStats};
pub use records::{CodeCacheSample, RunRecord, TaskRecord, ThreadRecord};
pub use run_name::{resolve_run_identity, RunIdentity, RunTally};
pub use session::{discover_log_files, ingest_files, run_session};
