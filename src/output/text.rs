//! Plain-text session summary for the terminal.

use super::schema::IngestSummary;

/// Longest run name shown before truncation
const NAME_WIDTH: usize = 36;

/// Render a summary table, one line per run plus totals
pub fn format_summary(summary: &IngestSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  Database: {}", summary.database));
    lines.push(format!(
        "  {:>4}  {:<width$}  {:>7}  {:>8}  {:>7}  {:>6}  {:>8}",
        "RUN",
        "NAME",
        "THREADS",
        "TASKS",
        "FAILED",
        "STALE",
        "SAMPLES",
        width = NAME_WIDTH
    ));

    for run in &summary.runs {
        lines.push(format!(
            "  {:>4}  {:<width$}  {:>7}  {:>8}  {:>7}  {:>6}  {:>8}",
            run.run_id,
            truncate(&run.name),
            run.threads,
            run.tasks,
            run.failed_tasks,
            run.stale_tasks,
            run.code_cache_samples,
            width = NAME_WIDTH
        ));
    }

    let totals = &summary.totals;
    lines.push(format!(
        "  {:>4}  {:<width$}  {:>7}  {:>8}  {:>7}  {:>6}  {:>8}",
        totals.runs,
        "total",
        totals.threads,
        totals.tasks,
        totals.failed_tasks,
        totals.stale_tasks,
        totals.code_cache_samples,
        width = NAME_WIDTH
    ));

    lines.join("\n")
}

fn truncate(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        return name.to_string();
    }
    let tail: String = name
        .chars()
        .rev()
        .take(NAME_WIDTH - 3)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::schema::RunSummary;
    use std::path::Path;

    #[test]
    fn test_format_summary_lists_runs_and_totals() {
        let run = RunSummary {
            run_id: 3,
            name: "17.b35 tc rcs240 (1)".to_string(),
            file: "b.log".to_string(),
            vm_start: None,
            threads: 1,
            tasks: 42,
            failed_tasks: 2,
            stale_tasks: 1,
            code_cache_samples: 40,
        };
        let summary = IngestSummary::new(Path::new("out.duckdb"), vec![run]);
        let text = format_summary(&summary);

        assert!(text.contains("out.duckdb"));
        assert!(text.contains("17.b35 tc rcs240 (1)"));
        assert!(text.lines().last().unwrap().contains("total"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_truncate_keeps_suffix() {
        let long = "x".repeat(50) + " (7)";
        let short = truncate(&long);
        assert_eq!(short.chars().count(), NAME_WIDTH);
        assert!(short.ends_with(" (7)"));
        assert!(short.starts_with("..."));
    }
}
