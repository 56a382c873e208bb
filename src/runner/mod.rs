//! Run loop module - drives repeated test runs until a streak or the cap.
//!
//! This module provides the core session logic, including:
//! - RunController, which owns counters and the termination decision
//! - RunSummary / RunRecord for reporting what happened

mod controller;

pub use controller::{RunController, RunRecord, RunSummary};
