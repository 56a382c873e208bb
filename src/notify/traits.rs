//! The notification seam and its message format.

use crate::domain::RunOutcome;
use crate::error::Result;

/// Title shown on every run notification.
pub const NOTIFICATION_TITLE: &str = "Test Notification";

/// Body text for the notification sent after run `run_index`.
pub fn format_message(
    run_index: u32,
    outcome: RunOutcome,
    consecutive_greens: u32,
    consecutive_fails: u32,
) -> String {
    format!(
        "Test {} {}. Consecutive greens: {}. Consecutive fails: {}",
        run_index, outcome, consecutive_greens, consecutive_fails
    )
}

/// Fire-and-forget alert after each run.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        run_index: u32,
        outcome: RunOutcome,
        consecutive_greens: u32,
        consecutive_fails: u32,
    ) -> Result<()>;
}

/// Notifier that drops everything.
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _run_index: u32, _outcome: RunOutcome, _: u32, _: u32) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_passed() {
        assert_eq!(
            format_message(4, RunOutcome::Passed, 2, 0),
            "Test 4 PASSED. Consecutive greens: 2. Consecutive fails: 0"
        );
    }

    #[test]
    fn test_format_message_failed() {
        assert_eq!(
            format_message(1, RunOutcome::Failed, 0, 1),
            "Test 1 FAILED. Consecutive greens: 0. Consecutive fails: 1"
        );
    }

    #[test]
    fn test_no_op_notifier() {
        assert!(NoOpNotifier.notify(1, RunOutcome::Failed, 0, 1).is_ok());
    }
}
