//! Shell-backed test command runner.
//!
//! Runs the configured command line through `sh -c` with stderr folded into
//! stdout, so the classifier sees the same interleaved text a terminal would.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use super::traits::{CommandOutput, CommandRunner, ExecutionError};

/// Command run when nothing else is configured.
pub const DEFAULT_TEST_COMMAND: &str = "npm test";

/// Configuration for the shell runner.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// The command line handed to `sh -c`
    pub command: String,

    /// Working directory; inherits the current one when unset
    pub working_dir: Option<PathBuf>,

    /// Per-run limit; no limit when unset
    pub timeout: Option<Duration>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_TEST_COMMAND.to_string(),
            working_dir: None,
            timeout: None,
        }
    }
}

impl ShellConfig {
    /// Create a new config with the given command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    /// Set the working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Bound each run; a run that exceeds it is killed and counts as failed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Runs a fixed command line through the shell.
pub struct ShellCommandRunner {
    config: ShellConfig,
}

impl ShellCommandRunner {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    /// Get the command being run.
    pub fn command(&self) -> &str {
        &self.config.command
    }

    fn build(&self) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(format!("exec 2>&1\n{}", self.config.command));
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }
        // Own process group so a timeout can take down npm, jest and friends too
        #[cfg(unix)]
        cmd.process_group(0);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// How long a killed run gets to close its pipes before its output is abandoned.
const KILL_GRACE: Duration = Duration::from_secs(5);

fn combine(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        log::warn!("Failed to kill process group {}: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn execute(&self) -> CommandOutput {
        let child = match self.build().spawn() {
            Ok(child) => child,
            Err(e) => return CommandOutput::failure("", ExecutionError::Launch(e)),
        };
        let pid = child.id();

        let wait = child.wait_with_output();
        tokio::pin!(wait);

        let output = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut wait).await {
                Ok(result) => result,
                Err(_) => {
                    if let Some(pid) = pid {
                        kill_process_group(pid);
                    }
                    // The group is gone, so the pipes close and whatever it printed is kept
                    let partial = match tokio::time::timeout(KILL_GRACE, &mut wait).await {
                        Ok(Ok(output)) => combine(&output),
                        _ => {
                            log::warn!("Output of the timed-out run was dropped");
                            String::new()
                        }
                    };
                    return CommandOutput::failure(partial, ExecutionError::TimedOut(limit));
                }
            },
            None => wait.await,
        };

        match output {
            Ok(output) => {
                let combined = combine(&output);
                if output.status.success() {
                    CommandOutput::success(combined)
                } else {
                    CommandOutput::failure(
                        combined,
                        ExecutionError::ExitStatus {
                            code: output.status.code(),
                        },
                    )
                }
            }
            Err(e) => CommandOutput::failure("", ExecutionError::Launch(e)),
        }
    }

    fn describe(&self) -> &str {
        &self.config.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_shell_config_default() {
        let config = ShellConfig::default();
        assert_eq!(config.command, "npm test");
        assert!(config.working_dir.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_shell_config_builder() {
        let config = ShellConfig::new("cargo test")
            .with_working_dir("/tmp")
            .with_timeout(Duration::from_secs(60));
        assert_eq!(config.command, "cargo test");
        assert_eq!(config.working_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_runner_success() {
        let runner = ShellCommandRunner::new(ShellConfig::new("echo hello"));
        let output = runner.execute().await;
        assert!(!output.is_error());
        assert_eq!(output.combined.trim(), "hello");
    }

    #[tokio::test]
    async fn test_runner_non_zero_exit() {
        let runner = ShellCommandRunner::new(ShellConfig::new("echo nope; exit 3"));
        let output = runner.execute().await;
        assert!(matches!(
            output.error,
            Some(ExecutionError::ExitStatus { code: Some(3) })
        ));
        assert!(output.combined.contains("nope"));
    }

    #[tokio::test]
    async fn test_runner_combines_stderr() {
        let runner = ShellCommandRunner::new(ShellConfig::new("echo out; echo err >&2"));
        let output = runner.execute().await;
        assert!(!output.is_error());
        assert!(output.combined.contains("out"));
        assert!(output.combined.contains("err"));
    }

    #[tokio::test]
    async fn test_runner_missing_program() {
        let runner = ShellCommandRunner::new(ShellConfig::new("definitely-not-a-real-binary-xyz"));
        let output = runner.execute().await;
        assert!(matches!(
            output.error,
            Some(ExecutionError::ExitStatus { code: Some(127) })
        ));
    }

    #[tokio::test]
    async fn test_runner_working_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "present").unwrap();
        let config = ShellConfig::new("cat marker.txt").with_working_dir(temp.path());
        let runner = ShellCommandRunner::new(config);
        let output = runner.execute().await;
        assert!(!output.is_error());
        assert_eq!(output.combined, "present");
    }

    #[tokio::test]
    async fn test_runner_bad_working_dir_is_launch_error() {
        let config = ShellConfig::new("true").with_working_dir("/nonexistent/flakeloop/dir");
        let runner = ShellCommandRunner::new(config);
        let output = runner.execute().await;
        assert!(matches!(output.error, Some(ExecutionError::Launch(_))));
    }

    #[tokio::test]
    async fn test_runner_timeout() {
        let config = ShellConfig::new("sleep 10").with_timeout(Duration::from_millis(100));
        let runner = ShellCommandRunner::new(config);
        let output = runner.execute().await;
        assert!(matches!(output.error, Some(ExecutionError::TimedOut(_))));
    }

    #[tokio::test]
    async fn test_runner_timeout_kills_whole_group() {
        let temp = TempDir::new().unwrap();
        let runner = ShellCommandRunner::new(
            ShellConfig::new("(sleep 1; touch leaked); echo done")
                .with_working_dir(temp.path())
                .with_timeout(Duration::from_millis(200)),
        );
        let output = runner.execute().await;
        assert!(matches!(output.error, Some(ExecutionError::TimedOut(_))));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!temp.path().join("leaked").exists());
    }

    #[tokio::test]
    async fn test_runner_timeout_keeps_partial_output() {
        let runner = ShellCommandRunner::new(
            ShellConfig::new("echo started; sleep 10").with_timeout(Duration::from_millis(300)),
        );
        let output = runner.execute().await;
        assert!(matches!(output.error, Some(ExecutionError::TimedOut(_))));
        assert!(output.combined.contains("started"));
    }

    #[test]
    fn test_describe_is_command() {
        let runner = ShellCommandRunner::new(ShellConfig::new("make check"));
        assert_eq!(runner.describe(), "make check");
        assert_eq!(runner.command(), "make check");
    }
}
