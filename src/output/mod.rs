//! Output writers for the ingestion report.
//!
//! This module handles everything written besides the database:
//! - JSON session reports
//! - Text summaries

pub mod json;
pub mod schema;
pub mod text;

// Re-export main types and functions
pub use json::{read_report, report_to_string, write_report};
pub use schema::{IngestSummary, RunSummary, Totals};
pub use text::format_summary;
