use crate::output::read_report;
use crate::store::Table;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate an ingestion report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let summary = read_report(file_path)
        .with_context(|| format!("Invalid report {}", file_path.display()))?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", summary.version);
    println!("  Database: {}", summary.database);
    println!("  Runs: {}", summary.totals.runs);
    println!("  Threads: {}", summary.totals.threads);
    println!("  Tasks: {}", summary.totals.tasks);
    println!("  Failed Tasks: {}", summary.totals.failed_tasks);
    println!("  Code Cache Samples: {}", summary.totals.code_cache_samples);

    Ok(())
}

/// Display the table layout of the dataset
pub fn display_schema(show_details: bool) {
    println!("JIT Log Dataset Schema");
    println!("Report Version: {}", REPORT_SCHEMA_VERSION);
    println!();

    if show_details {
        for table in Table::ALL {
            println!("{}", table.create_sql());
        }
    } else {
        for table in Table::ALL {
            println!("  {:<10} {} columns", table.name(), table.columns().len());
        }
        println!();
        println!("Use --show for column details");
    }
}

/// Display version information
pub fn display_version() {
    println!("jit-log-ingest v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("Loads JIT compilation logs into a columnar DuckDB dataset.");
}
