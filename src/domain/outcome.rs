//! Run outcome and stop types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single invocation of the test command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Passed,
    Failed,
}

impl RunOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, RunOutcome::Passed)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Passed => write!(f, "PASSED"),
            RunOutcome::Failed => write!(f, "FAILED"),
        }
    }
}

/// Which threshold ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// Consecutive passing runs reached the green threshold
    GreenStreakReached,
    /// Consecutive failing runs reached the fail threshold
    FailStreakReached,
    /// The total-run cap was hit without either streak
    RunCapReached,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::GreenStreakReached => write!(f, "green streak reached"),
            StopReason::FailStreakReached => write!(f, "fail streak reached"),
            StopReason::RunCapReached => write!(f, "run cap reached"),
        }
    }
}

/// Lifecycle of a `RunController`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Created, `run` not yet called
    Idle,
    /// Executing runs
    Running,
    StoppedGreen,
    StoppedFail,
    StoppedCap,
}

impl ControllerState {
    /// Returns true once the controller has stopped for any reason
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ControllerState::StoppedGreen
                | ControllerState::StoppedFail
                | ControllerState::StoppedCap
        )
    }
}

impl From<StopReason> for ControllerState {
    fn from(reason: StopReason) -> Self {
        match reason {
            StopReason::GreenStreakReached => ControllerState::StoppedGreen,
            StopReason::FailStreakReached => ControllerState::StoppedFail,
            StopReason::RunCapReached => ControllerState::StoppedCap,
        }
    }
}
