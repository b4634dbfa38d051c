//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod ingest;
pub mod utils;

// Re-export main command functions
pub use ingest::{execute_ingest, validate_args, IngestArgs};
pub use utils::{display_schema, display_version, validate_report_file};
