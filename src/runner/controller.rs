//! Run controller - the session state machine.
//!
//! The RunController executes the test command repeatedly, one run at a time,
//! until a green streak, a fail streak, or the run cap ends the session.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{ControllerState, RunOutcome, RunStatistics, StopReason, TerminationPolicy};
use crate::execution::{CommandRunner, DEFAULT_FAILURE_MARKER, classify};
use crate::notify::Notifier;
use crate::prompt::ConfirmPrompt;

/// One completed run, kept in memory for the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    /// 1-based run index
    pub index: u32,
    pub outcome: RunOutcome,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
}

/// What a finished session reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_runs: u32,
    pub failed_runs: u32,
    pub successful_runs: u32,
    pub stop_reason: StopReason,
    pub runs: Vec<RunRecord>,
}

impl RunSummary {
    /// Process exit code for this summary.
    ///
    /// Always 0 unless `strict`, in which case a fail streak maps to 1.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.stop_reason == StopReason::FailStreakReached {
            1
        } else {
            0
        }
    }
}

/// RunController drives one session of repeated test runs.
///
/// Each run:
/// 1. Executes the command through the `CommandRunner`
/// 2. Classifies the result against the failure marker
/// 3. Updates counters and logs them
/// 4. Sends one notification
/// 5. Checks green streak, fail streak, then the run cap
/// 6. If continuing, waits on the `ConfirmPrompt`
pub struct RunController<R, N, C>
where
    R: CommandRunner + ?Sized,
    N: Notifier + ?Sized,
    C: ConfirmPrompt + ?Sized,
{
    policy: TerminationPolicy,
    runner: Arc<R>,
    notifier: Arc<N>,
    confirm: Arc<C>,
    failure_marker: String,
    stats: RunStatistics,
    state: ControllerState,
    history: Vec<RunRecord>,
    stop_reason: Option<StopReason>,
}

impl<R, N, C> RunController<R, N, C>
where
    R: CommandRunner + ?Sized,
    N: Notifier + ?Sized,
    C: ConfirmPrompt + ?Sized,
{
    /// Create a controller with the default failure marker.
    pub fn new(
        policy: TerminationPolicy,
        runner: Arc<R>,
        notifier: Arc<N>,
        confirm: Arc<C>,
    ) -> Self {
        Self {
            policy,
            runner,
            notifier,
            confirm,
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
            stats: RunStatistics::default(),
            state: ControllerState::Idle,
            history: Vec::new(),
            stop_reason: None,
        }
    }

    /// Use a different failure marker.
    pub fn with_failure_marker(mut self, marker: impl Into<String>) -> Self {
        self.failure_marker = marker.into();
        self
    }

    pub fn policy(&self) -> &TerminationPolicy {
        &self.policy
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Run the session to completion.
    ///
    /// Never fails: individual run failures are part of the summary. Calling
    /// this again after the session stopped returns the same summary without
    /// running anything.
    pub async fn run(&mut self) -> RunSummary {
        if let Some(reason) = self.stop_reason {
            return self.summary(reason);
        }

        self.state = ControllerState::Running;
        log::debug!(
            "Starting session: command '{}', greens {}, fails {}, max runs {}",
            self.runner.describe(),
            self.policy.max_consecutive_greens(),
            self.policy.max_consecutive_fails(),
            self.policy.max_runs()
        );

        let mut run_index = 1;
        loop {
            self.run_once(run_index).await;

            if let Some(reason) = self.policy.evaluate(&self.stats, run_index) {
                self.log_stop(reason);
                self.stop_reason = Some(reason);
                self.state = reason.into();
                return self.summary(reason);
            }

            self.confirm.wait_for_advance(run_index + 1).await;
            run_index += 1;
        }
    }

    /// Execute, classify, record, log and notify for a single run.
    async fn run_once(&mut self, run_index: u32) {
        log::info!("Running tests {}...", run_index);

        let start = Instant::now();
        let output = self.runner.execute().await;
        let duration = start.elapsed();

        match &output.error {
            Some(e) => {
                log::error!("Error running tests: {}", e);
                if !output.combined.is_empty() {
                    log::debug!("{}", output.combined);
                }
            }
            None => log::info!("{}", output.combined),
        }

        let outcome = classify(&output, &self.failure_marker);
        self.stats.record(outcome);
        for line in self.stats.lines() {
            log::info!("{}", line);
        }

        if let Err(e) = self.notifier.notify(
            run_index,
            outcome,
            self.stats.consecutive_greens,
            self.stats.consecutive_fails,
        ) {
            log::warn!("Failed to send notification for test {}: {}", run_index, e);
        }

        self.history.push(RunRecord {
            index: run_index,
            outcome,
            duration_ms: duration.as_millis() as u64,
            finished_at: Utc::now(),
        });
    }

    fn log_stop(&self, reason: StopReason) {
        match reason {
            StopReason::GreenStreakReached => log::info!(
                "Achieved {} consecutive green runs. Exiting.",
                self.policy.max_consecutive_greens()
            ),
            StopReason::FailStreakReached => log::info!(
                "Encountered {} consecutive failed runs. Exiting.",
                self.policy.max_consecutive_fails()
            ),
            StopReason::RunCapReached => log::info!(
                "Reached maximum number of test runs ({}). Exiting.",
                self.policy.max_runs()
            ),
        }
    }

    fn summary(&self, stop_reason: StopReason) -> RunSummary {
        RunSummary {
            total_runs: self.stats.total_runs,
            failed_runs: self.stats.failed_runs,
            successful_runs: self.stats.successful_runs,
            stop_reason,
            runs: self.history.clone(),
        }
    }
}
