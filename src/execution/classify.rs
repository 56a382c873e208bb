//! Pass/fail classification of a command result.
//!
//! This is a plain substring match, not a parse of the test framework's
//! output: a passing run that happens to print the marker counts as a failure,
//! and a crashed command that exits 0 without printing it counts as a pass.

use crate::domain::RunOutcome;
use crate::execution::CommandOutput;

/// Marker Jest prints for a failing suite.
pub const DEFAULT_FAILURE_MARKER: &str = "FAIL";

/// Classify one command result.
///
/// Any process error (launch failure, non-zero exit, timeout) is a failure.
/// Otherwise the run failed iff `marker` occurs in the combined output
/// (case-sensitive).
pub fn classify(output: &CommandOutput, marker: &str) -> RunOutcome {
    if output.is_error() || output.combined.contains(marker) {
        RunOutcome::Failed
    } else {
        RunOutcome::Passed
    }
}
