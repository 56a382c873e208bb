//! End-of-session report.
//!
//! Renders a `RunSummary` as colored terminal lines, or as JSON for scripts.

use colored::*;

use crate::domain::{RunOutcome, StopReason, TerminationPolicy};
use crate::runner::RunSummary;

/// Human-readable lines describing a finished session.
pub fn render_summary(summary: &RunSummary, policy: &TerminationPolicy) -> Vec<String> {
    let mut lines = Vec::new();

    let headline = match summary.stop_reason {
        StopReason::GreenStreakReached => format!(
            "Stopped: {} consecutive green runs",
            policy.max_consecutive_greens()
        )
        .green()
        .bold(),
        StopReason::FailStreakReached => format!(
            "Stopped: {} consecutive failed runs",
            policy.max_consecutive_fails()
        )
        .red()
        .bold(),
        StopReason::RunCapReached => format!("Stopped: reached {} runs", policy.max_runs())
            .yellow()
            .bold(),
    };
    lines.push(headline.to_string());

    lines.push(format!(
        "{} total, {} passed, {} failed",
        summary.total_runs,
        summary.successful_runs.to_string().green(),
        summary.failed_runs.to_string().red()
    ));

    if !summary.runs.is_empty() {
        let marks: String = summary
            .runs
            .iter()
            .map(|r| match r.outcome {
                RunOutcome::Passed => "✓".green().to_string(),
                RunOutcome::Failed => "✗".red().to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("History: {}", marks));

        let total_ms: u64 = summary.runs.iter().map(|r| r.duration_ms).sum();
        lines.push(format!(
            "Average run time: {:.1}s",
            total_ms as f64 / summary.runs.len() as f64 / 1000.0
        ));
    }

    lines
}

/// The summary as pretty-printed JSON.
pub fn summary_json(summary: &RunSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunRecord;
    use chrono::Utc;

    fn summary(reason: StopReason, outcomes: &[RunOutcome]) -> RunSummary {
        let runs: Vec<RunRecord> = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| RunRecord {
                index: i as u32 + 1,
                outcome: *outcome,
                duration_ms: 1500,
                finished_at: Utc::now(),
            })
            .collect();
        let failed = outcomes.iter().filter(|o| !o.is_passed()).count() as u32;
        RunSummary {
            total_runs: runs.len() as u32,
            failed_runs: failed,
            successful_runs: runs.len() as u32 - failed,
            stop_reason: reason,
            runs,
        }
    }

    #[test]
    fn test_render_green_summary() {
        colored::control::set_override(false);
        let s = summary(
            StopReason::GreenStreakReached,
            &[RunOutcome::Failed, RunOutcome::Passed, RunOutcome::Passed, RunOutcome::Passed],
        );
        let lines = render_summary(&s, &TerminationPolicy::default());
        assert_eq!(lines[0], "Stopped: 3 consecutive green runs");
        assert_eq!(lines[1], "4 total, 3 passed, 1 failed");
        assert_eq!(lines[2], "History: ✗ ✓ ✓ ✓");
        assert_eq!(lines[3], "Average run time: 1.5s");
    }

    #[test]
    fn test_render_cap_summary() {
        colored::control::set_override(false);
        let policy = TerminationPolicy::new(3, 3, 2).unwrap();
        let s = summary(StopReason::RunCapReached, &[RunOutcome::Passed, RunOutcome::Failed]);
        let lines = render_summary(&s, &policy);
        assert_eq!(lines[0], "Stopped: reached 2 runs");
    }

    #[test]
    fn test_render_empty_history() {
        colored::control::set_override(false);
        let s = summary(StopReason::FailStreakReached, &[]);
        let lines = render_summary(&s, &TerminationPolicy::default());
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_summary_json() {
        let s = summary(StopReason::FailStreakReached, &[RunOutcome::Failed]);
        let json = summary_json(&s).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stop_reason"], "fail-streak-reached");
        assert_eq!(value["failed_runs"], 1);
        assert_eq!(value["runs"][0]["outcome"], "failed");
    }
}
