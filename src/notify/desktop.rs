//! Native desktop notifications.
//!
//! Spawns the platform's notification helper without blocking the run loop:
//! `osascript` on macOS, `notify-send` everywhere else. A detached thread
//! reaps the helper once it exits.

use std::process::{Child, Command, Stdio};
use std::thread;

use super::traits::{NOTIFICATION_TITLE, Notifier, format_message};
use crate::domain::RunOutcome;
use crate::error::{FlakeloopError, Result};

pub struct DesktopNotifier {
    title: String,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
        }
    }

    /// Override the notification title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn command(&self, message: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("osascript");
            cmd.arg("-e").arg(format!(
                "display notification {} with title {}",
                applescript_quote(message),
                applescript_quote(&self.title)
            ));
            cmd
        } else {
            let mut cmd = Command::new("notify-send");
            cmd.arg(&self.title).arg(message);
            cmd
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn notify(
        &self,
        run_index: u32,
        outcome: RunOutcome,
        consecutive_greens: u32,
        consecutive_fails: u32,
    ) -> Result<()> {
        let message = format_message(run_index, outcome, consecutive_greens, consecutive_fails);
        let child = self
            .command(&message)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| FlakeloopError::Notification(format!("failed to spawn notifier: {}", e)))?;
        reap(child);
        Ok(())
    }
}

fn reap(mut child: Child) {
    thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => {
            log::debug!("Notification helper exited with {}", status)
        }
        Ok(_) => {}
        Err(e) => log::debug!("Failed to wait for notification helper: {}", e),
    });
}

fn applescript_quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
