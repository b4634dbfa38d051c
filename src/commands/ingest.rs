//! Ingest command implementation.
//!
//! The ingest command:
//! 1. Discovers log files in the log directory
//! 2. Rebuilds the database from scratch in one transaction
//! 3. Writes the optional JSON report
//! 4. Prints the optional text summary

use crate::ingest::run_session;
use crate::output::{format_summary, write_report, IngestSummary};
use crate::utils::config::IngestConfig;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

/// Arguments for the ingest command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct IngestArgs {
    /// Log directory, database path and suffix
    pub config: IngestConfig,

    /// Output path for the JSON report (optional)
    pub report: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

/// Execute the ingest command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Ingest command arguments
/// * `cancel` - optional flag checked between log files
///
/// # Errors
/// * Log directory cannot be listed
/// * Any log file is malformed or incomplete
/// * Database or report write failures
pub fn execute_ingest(args: &IngestArgs, cancel: Option<&AtomicBool>) -> Result<IngestSummary> {
    info!(
        "Ingesting {} into {}",
        args.config.log_dir.display(),
        args.config.database.display()
    );

    let summary = run_session(&args.config, cancel).with_context(|| {
        format!(
            "Failed to ingest logs from {}",
            args.config.log_dir.display()
        )
    })?;

    info!("✓ Database written to: {}", args.config.database.display());

    if let Some(report_path) = &args.report {
        write_report(&summary, report_path).context("Failed to write ingestion report")?;
        info!("✓ Report written to: {}", report_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("INGESTION SUMMARY");
        println!("{}", "=".repeat(80));
        println!("{}", format_summary(&summary));
        println!("{}", "=".repeat(80));
    }

    Ok(summary)
}

/// Validate ingest arguments
///
/// **Public** - can be called before execute_ingest for early validation
pub fn validate_args(args: &IngestArgs) -> Result<()> {
    let config = &args.config;

    if config.log_dir.as_os_str().is_empty() {
        anyhow::bail!("Log directory cannot be empty");
    }

    if !config.log_dir.is_dir() {
        anyhow::bail!("Log directory does not exist: {}", config.log_dir.display());
    }

    if config.database.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    if config.database.is_dir() {
        anyhow::bail!("Database path is a directory: {}", config.database.display());
    }

    if config.suffix.is_empty() {
        anyhow::bail!("Log file suffix cannot be empty");
    }

    if let Some(report) = &args.report {
        if report == &config.database {
            anyhow::bail!("Report and database must be different files");
        }
    }

    Ok(())
}
