//! Termination thresholds for a run session.

use crate::domain::{RunStatistics, StopReason};
use crate::error::{FlakeloopError, Result};

/// Consecutive passing runs that end a session by default.
pub const DEFAULT_MAX_CONSECUTIVE_GREENS: u32 = 3;

/// Consecutive failing runs that end a session by default.
pub const DEFAULT_MAX_CONSECUTIVE_FAILS: u32 = 3;

/// Total runs allowed in a session by default.
pub const DEFAULT_MAX_RUNS: u32 = 20;

/// Thresholds deciding when the run loop stops.
///
/// Every threshold is at least 1; `new` refuses anything else so the
/// controller never has to re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationPolicy {
    max_consecutive_greens: u32,
    max_consecutive_fails: u32,
    max_runs: u32,
}

impl TerminationPolicy {
    pub fn new(
        max_consecutive_greens: u32,
        max_consecutive_fails: u32,
        max_runs: u32,
    ) -> Result<Self> {
        if max_consecutive_greens == 0 {
            return Err(FlakeloopError::InvalidPolicy(
                "max consecutive greens must be >= 1".to_string(),
            ));
        }
        if max_consecutive_fails == 0 {
            return Err(FlakeloopError::InvalidPolicy(
                "max consecutive fails must be >= 1".to_string(),
            ));
        }
        if max_runs == 0 {
            return Err(FlakeloopError::InvalidPolicy("max runs must be >= 1".to_string()));
        }
        Ok(Self {
            max_consecutive_greens,
            max_consecutive_fails,
            max_runs,
        })
    }

    pub fn max_consecutive_greens(&self) -> u32 {
        self.max_consecutive_greens
    }

    pub fn max_consecutive_fails(&self) -> u32 {
        self.max_consecutive_fails
    }

    pub fn max_runs(&self) -> u32 {
        self.max_runs
    }

    /// Decide whether the session ends after run `run_index` (1-based).
    ///
    /// Green streak is checked first, then fail streak, then the run cap, so a
    /// streak that completes on the last allowed run reports the streak.
    pub fn evaluate(&self, stats: &RunStatistics, run_index: u32) -> Option<StopReason> {
        if stats.consecutive_greens >= self.max_consecutive_greens {
            Some(StopReason::GreenStreakReached)
        } else if stats.consecutive_fails >= self.max_consecutive_fails {
            Some(StopReason::FailStreakReached)
        } else if run_index >= self.max_runs {
            Some(StopReason::RunCapReached)
        } else {
            None
        }
    }
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_greens: DEFAULT_MAX_CONSECUTIVE_GREENS,
            max_consecutive_fails: DEFAULT_MAX_CONSECUTIVE_FAILS,
            max_runs: DEFAULT_MAX_RUNS,
        }
    }
}
