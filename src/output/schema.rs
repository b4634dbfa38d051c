//! Ingestion report schema.
//!
//! This module defines the structure of the JSON report written after a
//! session. Schema is versioned to allow future evolution.

use crate::ingest::FileStats;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Database file the dataset was written to
    pub database: String,

    /// One entry per ingested log file, in run id order
    pub runs: Vec<RunSummary>,

    pub totals: Totals,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl IngestSummary {
    pub fn new(database: &Path, runs: Vec<RunSummary>) -> Self {
        let totals = Totals::from_runs(&runs);
        Self {
            version: REPORT_SCHEMA_VERSION.to_string(),
            database: database.display().to_string(),
            runs,
            totals,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: u32,
    pub name: String,
    pub file: String,

    /// VM start as RFC 3339, if the epoch is representable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_start: Option<String>,

    pub threads: u64,
    pub tasks: u64,
    pub failed_tasks: u64,
    pub stale_tasks: u64,
    pub code_cache_samples: u64,
}

impl RunSummary {
    pub fn from_stats(run_id: u32, file: &Path, stats: &FileStats) -> Self {
        Self {
            run_id,
            name: stats.run_name.clone().unwrap_or_default(),
            file: file.display().to_string(),
            vm_start: stats
                .vm_start_ms
                .and_then(|ms| i64::try_from(ms).ok())
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|start| start.to_rfc3339()),
            threads: stats.threads,
            tasks: stats.tasks,
            failed_tasks: stats.failed_tasks,
            stale_tasks: stats.stale_tasks,
            code_cache_samples: stats.code_cache_samples,
        }
    }
}

/// Sums over all runs of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub runs: u64,
    pub threads: u64,
    pub tasks: u64,
    pub failed_tasks: u64,
    pub stale_tasks: u64,
    pub code_cache_samples: u64,
}

impl Totals {
    pub fn from_runs(runs: &[RunSummary]) -> Self {
        runs.iter().fold(Totals::default(), |mut totals, run| {
            totals.runs += 1;
            totals.threads += run.threads;
            totals.tasks += run.tasks;
            totals.failed_tasks += run.failed_tasks;
            totals.stale_tasks += run.stale_tasks;
            totals.code_cache_samples += run.code_cache_samples;
            totals
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stats_formats_vm_start() {
        let stats = FileStats {
            run_name: Some("21.b509 tc rcs240 (0)".to_string()),
            vm_start_ms: Some(0),
            tasks: 2,
            ..Default::default()
        };
        let run = RunSummary::from_stats(0, Path::new("logs/a.log"), &stats);

        assert_eq!(run.vm_start.as_deref(), Some("1970-01-01T00:00:00+00:00"));
        assert_eq!(run.tasks, 2);
    }

    #[test]
    fn test_totals() {
        let stats = FileStats {
            run_name: Some("r".to_string()),
            tasks: 3,
            failed_tasks: 1,
            stale_tasks: 1,
            ..Default::default()
        };
        let runs = vec![
            RunSummary::from_stats(0, Path::new("a.log"), &stats),
            RunSummary::from_stats(1, Path::new("b.log"), &stats),
        ];
        let totals = Totals::from_runs(&runs);

        assert_eq!(totals.runs, 2);
        assert_eq!(totals.tasks, 6);
        assert_eq!(totals.stale_tasks, 2);
    }
}
