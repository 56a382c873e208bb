//! Aggregate run counters and streak tracking.

use crate::domain::RunOutcome;
use serde::{Deserialize, Serialize};

/// Counters for one session.
///
/// `total_runs == failed_runs + successful_runs`, and at most one of the two
/// streak counters is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_runs: u32,
    pub failed_runs: u32,
    pub successful_runs: u32,
    pub consecutive_greens: u32,
    pub consecutive_fails: u32,
}

impl RunStatistics {
    /// Fold one completed run into the counters.
    pub fn record(&mut self, outcome: RunOutcome) {
        self.total_runs += 1;
        match outcome {
            RunOutcome::Failed => {
                self.failed_runs += 1;
                self.consecutive_fails += 1;
                self.consecutive_greens = 0;
            }
            RunOutcome::Passed => {
                self.successful_runs += 1;
                self.consecutive_greens += 1;
                self.consecutive_fails = 0;
            }
        }
    }

    /// The five lines logged after every run.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Total tests run: {}", self.total_runs),
            format!("Failed tests: {}", self.failed_runs),
            format!("Successful tests: {}", self.successful_runs),
            format!("Consecutive green runs: {}", self.consecutive_greens),
            format!("Consecutive failed runs: {}", self.consecutive_fails),
        ]
    }
}
