//! Terminal notifications via the OSC 9 escape sequence.
//!
//! Terminals such as iTerm2, Ghostty, WezTerm and kitty turn
//! `ESC ] 9 ; message BEL` into a desktop notification; others ignore it.

use std::io::{self, Write};
use std::sync::Mutex;

use super::traits::{Notifier, format_message};
use crate::domain::RunOutcome;
use crate::error::{FlakeloopError, Result};

pub struct TerminalNotifier<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalNotifier<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(
        &self,
        run_index: u32,
        outcome: RunOutcome,
        consecutive_greens: u32,
        consecutive_fails: u32,
    ) -> Result<()> {
        let message = format_message(run_index, outcome, consecutive_greens, consecutive_fails);
        let mut out = self
            .out
            .lock()
            .map_err(|_| FlakeloopError::Notification("terminal writer poisoned".to_string()))?;
        write!(out, "\x1b]9;{}\x07", message)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_osc9_sequence() {
        let notifier = TerminalNotifier::new(Vec::new());
        notifier.notify(2, RunOutcome::Failed, 0, 2).unwrap();
        let written = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(
            written,
            "\x1b]9;Test 2 FAILED. Consecutive greens: 0. Consecutive fails: 2\x07"
        );
    }

    #[test]
    fn test_one_sequence_per_notification() {
        let notifier = TerminalNotifier::new(Vec::new());
        notifier.notify(1, RunOutcome::Passed, 1, 0).unwrap();
        notifier.notify(2, RunOutcome::Passed, 2, 0).unwrap();
        let written = String::from_utf8(notifier.into_inner()).unwrap();
        assert_eq!(written.matches("\x1b]9;").count(), 2);
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let notifier = TerminalNotifier::new(BrokenWriter);
        let err = notifier.notify(1, RunOutcome::Passed, 1, 0).unwrap_err();
        assert!(matches!(err, FlakeloopError::Io(_)));
    }
}
