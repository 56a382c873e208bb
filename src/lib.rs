//! flakeloop - re-run a flaky test command until it settles
//!
//! Runs a test command over and over, classifies every run as pass or fail,
//! and stops on a green streak, a red streak, or a total-run cap. Each run
//! triggers a notification, and the operator confirms before the next one.

pub mod domain;
pub mod error;
pub mod execution;
pub mod notify;
pub mod prompt;
pub mod report;
pub mod runner;

pub use error::{FlakeloopError, Result};
