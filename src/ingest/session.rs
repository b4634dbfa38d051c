//! Ingestion session: every log file of a directory into one dataset.
//!
//! Files are processed one after another in ascending modification time, so
//! run ids (`0..N-1`) are reproducible for an unchanged directory. All rows
//! go through one store transaction; the first error aborts the session and
//! nothing is kept.

use super::extractor::extract_log;
use super::run_name::RunTally;
use crate::output::{IngestSummary, RunSummary};
use crate::store::{ColumnarSink, Store};
use crate::utils::config::IngestConfig;
use crate::utils::error::IngestError;
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime};
use walkdir::WalkDir;

/// Find log files under `dir`, ordered by last modification time
///
/// **Public** - also used to preview a session
///
/// Ties are broken by path so the order never depends on directory listing
/// order.
pub fn discover_log_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, IngestError> {
    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| IngestError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(suffix) {
            debug!("Ignoring {}", entry.path().display());
            continue;
        }
        let modified = entry
            .metadata()
            .map_err(|e| IngestError::Io(e.into()))?
            .modified()?;
        files.push((modified, entry.into_path()));
    }

    files.sort();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Extract `files` into `sink`, assigning run ids in the given order
///
/// **Public** - sink-agnostic core of a session
///
/// # Arguments
/// * `files` - log files, already in run order
/// * `sink` - destination for all rows
/// * `cancel` - checked before each file; when set the session stops
///
/// # Errors
/// The first error of any file, located with its path
pub fn ingest_files<S: ColumnarSink + ?Sized>(
    files: &[PathBuf],
    sink: &mut S,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<RunSummary>, IngestError> {
    // one tally per session
    let mut tally = RunTally::new();
    let mut runs = Vec::with_capacity(files.len());

    for (run_id, path) in files.iter().enumerate() {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            info!("Cancelled before {}", path.display());
            return Err(IngestError::Cancelled);
        }

        let run_id = u32::try_from(run_id)
            .map_err(|_| IngestError::InvariantViolation("too many log files".to_string()))?;
        info!("Run {}: {}", run_id, path.display());

        let file = File::open(path).map_err(|e| IngestError::from(e).in_file(path))?;
        let stats = extract_log(run_id, BufReader::new(file), &mut *sink, &mut tally)
            .map_err(|e| e.in_file(path))?;

        runs.push(RunSummary::from_stats(run_id, path, &stats));
    }

    Ok(runs)
}

/// Run a complete ingestion session into the configured DuckDB file
///
/// **Public** - main entry point called from the ingest command
///
/// # Arguments
/// * `config` - log directory, database path and log suffix
/// * `cancel` - optional cooperative cancellation flag
///
/// # Returns
/// Summary of the committed dataset
///
/// # Errors
/// Any ingestion or store error. The database is rolled back and removed;
/// an existing database is only replaced once the log directory was listed.
pub fn run_session(
    config: &IngestConfig,
    cancel: Option<&AtomicBool>,
) -> Result<IngestSummary, IngestError> {
    let started = Instant::now();
    let files = discover_log_files(&config.log_dir, &config.suffix)?;
    info!(
        "Found {} log file(s) in {}",
        files.len(),
        config.log_dir.display()
    );

    let store = Store::create(&config.database)?;
    store.begin()?;

    let outcome = store.sink().map_err(IngestError::from).and_then(|mut sink| {
        let runs = ingest_files(&files, &mut sink, cancel)?;
        sink.finish()?;
        Ok(runs)
    });

    match outcome {
        Ok(runs) => {
            store.commit()?;
            info!(
                "Ingested {} run(s) in {:.2}s",
                runs.len(),
                started.elapsed().as_secs_f64()
            );
            Ok(IngestSummary::new(&config.database, runs))
        }
        Err(e) => {
            store.abort();
            Err(e)
        }
    }
}
