//! JSON report writer.
//!
//! Writes the ingestion summary to a pretty-printed JSON file and reads it
//! back for validation.

use super::schema::IngestSummary;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write an ingestion report to a JSON file
///
/// **Public** - main entry point for report output
///
/// # Arguments
/// * `summary` - Summary of a committed session
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(summary: &IngestSummary, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a report to a string
pub fn report_to_string(summary: &IngestSummary) -> Result<String, OutputError> {
    serde_json::to_string_pretty(summary).map_err(OutputError::SerializationFailed)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<IngestSummary, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let summary: IngestSummary =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} run(s)",
        summary.version,
        summary.runs.len()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::schema::RunSummary;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn create_test_summary() -> IngestSummary {
        let run = RunSummary {
            run_id: 0,
            name: "21.b509 cc2 tc rcs240 (0)".to_string(),
            file: "logs/a.log".to_string(),
            vm_start: None,
            threads: 2,
            tasks: 10,
            failed_tasks: 1,
            stale_tasks: 0,
            code_cache_samples: 9,
        };
        IngestSummary::new(Path::new("log.duckdb"), vec![run])
    }

    #[test]
    fn test_write_and_read_report() {
        let summary = create_test_summary();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&summary, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded, summary);
    }

    #[test]
    fn test_vm_start_omitted_when_absent() {
        let json = report_to_string(&create_test_summary()).unwrap();
        assert!(!json.contains("vm_start"));
        assert!(json.contains("\"tasks\": 10"));
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&create_test_summary(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_report_rejects_garbage() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not json").unwrap();

        assert!(matches!(
            read_report(temp_file.path()),
            Err(OutputError::SerializationFailed(_))
        ));
    }
}
