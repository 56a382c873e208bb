//! Domain types for flakeloop
//!
//! This module contains the run-loop data model:
//! - RunOutcome: pass/fail classification of a single run
//! - RunStatistics: aggregate counters and streaks
//! - TerminationPolicy: the thresholds that end a session
//! - StopReason / ControllerState: why and where the loop stopped

pub mod outcome;
pub mod policy;
pub mod stats;

pub use outcome::{ControllerState, RunOutcome, StopReason};
pub use policy::TerminationPolicy;
pub use stats::RunStatistics;
