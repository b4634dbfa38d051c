//! JIT Log Ingest CLI
//!
//! Loads JIT compilation logs into a columnar DuckDB dataset.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use jit_log_ingest::commands::{
    display_schema, display_version, execute_ingest, validate_args, validate_report_file,
    IngestArgs,
};
use jit_log_ingest::utils::config::{
    IngestConfig, DEFAULT_DATABASE_FILE, DEFAULT_LOG_DIR, LOG_FILE_SUFFIX,
};

/// JIT Log Ingest - compilation logs to DuckDB
#[derive(Parser, Debug)]
#[command(name = "jit-log-ingest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the database from every log file in a directory
    Ingest {
        /// Directory searched recursively for log files
        #[arg(short, long, env = "JIT_LOG_DIR", default_value = DEFAULT_LOG_DIR)]
        logs: PathBuf,

        /// DuckDB file to (re)create
        #[arg(short, long, env = "JIT_LOG_DATABASE", default_value = DEFAULT_DATABASE_FILE)]
        database: PathBuf,

        /// Output path for a JSON ingestion report (optional)
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate an ingestion report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display the dataset schema
    Schema {
        /// Show full table definitions
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Ingest {
            logs,
            database,
            report,
            summary,
        } => {
            let args = IngestArgs {
                config: IngestConfig {
                    log_dir: logs,
                    database,
                    suffix: LOG_FILE_SUFFIX.to_string(),
                },
                report,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_ingest(&args, None)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
