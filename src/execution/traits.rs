// Execution seam between the run controller and the outside world

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Why a command did not complete cleanly.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to launch command: {0}")]
    Launch(#[from] std::io::Error),

    #[error("command exited with status {}", describe_code(.code))]
    ExitStatus { code: Option<i32> },

    #[error("command timed out after {0:?}")]
    TimedOut(Duration),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// Combined stdout/stderr of one invocation plus its process error, if any.
#[derive(Debug, Default)]
pub struct CommandOutput {
    pub combined: String,
    pub error: Option<ExecutionError>,
}

impl CommandOutput {
    /// Output from a command that exited successfully
    pub fn success(combined: impl Into<String>) -> Self {
        Self {
            combined: combined.into(),
            error: None,
        }
    }

    /// Output from a command that failed to launch or exited unsuccessfully
    pub fn failure(combined: impl Into<String>, error: ExecutionError) -> Self {
        Self {
            combined: combined.into(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Runs the pre-configured test command once per call.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute the command and wait for it to finish.
    ///
    /// Never returns an error: launch failures and non-zero exits are carried
    /// in `CommandOutput::error` so the caller can classify them as a failed run.
    async fn execute(&self) -> CommandOutput;

    /// Human-readable command line for logs
    fn describe(&self) -> &str {
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output_success() {
        let output = CommandOutput::success("all good");
        assert!(!output.is_error());
        assert_eq!(output.combined, "all good");
    }

    #[test]
    fn test_command_output_failure() {
        let output = CommandOutput::failure("boom", ExecutionError::ExitStatus { code: Some(2) });
        assert!(output.is_error());
        assert_eq!(output.combined, "boom");
    }

    #[test]
    fn test_exit_status_display() {
        let err = ExecutionError::ExitStatus { code: Some(1) };
        assert_eq!(err.to_string(), "command exited with status 1");
        let err = ExecutionError::ExitStatus { code: None };
        assert_eq!(err.to_string(), "command exited with status signal");
    }

    #[test]
    fn test_timed_out_display() {
        let err = ExecutionError::TimedOut(Duration::from_secs(5));
        assert_eq!(err.to_string(), "command timed out after 5s");
    }

    struct FixedRunner;

    #[async_trait]
    impl CommandRunner for FixedRunner {
        async fn execute(&self) -> CommandOutput {
            CommandOutput::success("Tests: 3 passed")
        }
    }

    #[tokio::test]
    async fn test_command_runner_trait_default_describe() {
        let runner = FixedRunner;
        assert_eq!(runner.describe(), "command");
        assert!(!runner.execute().await.is_error());
    }
}
