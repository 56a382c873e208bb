//! Operator confirmation between runs.
//!
//! The controller blocks on a `ConfirmPrompt` before every run after the
//! first. End-of-input and read errors count as the advance signal, so a
//! closed stdin just keeps the loop going.

use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex as StdMutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

/// Blocks until the operator is ready for the next run.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn wait_for_advance(&self, next_run: u32);
}

/// Prompt line shown before run `next_run`.
pub fn prompt_text(next_run: u32) -> String {
    format!("Press Enter to run test {} or Ctrl+C to stop...", next_run)
}

/// Prints a prompt and waits for one line of input.
pub struct LinePrompt<R, W> {
    input: Mutex<R>,
    output: StdMutex<W>,
}

/// `LinePrompt` on the process's stdin/stdout.
pub type StdinPrompt = LinePrompt<BufReader<Stdin>, std::io::Stdout>;

impl StdinPrompt {
    pub fn stdin() -> Self {
        LinePrompt::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<R, W> LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: StdMutex::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn show(&self, next_run: u32) {
        if let Ok(mut out) = self.output.lock() {
            let _ = write!(out, "{}", prompt_text(next_run));
            let _ = out.flush();
        }
    }
}

#[async_trait]
impl<R, W> ConfirmPrompt for LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn wait_for_advance(&self, next_run: u32) {
        self.show(next_run);
        let mut line = String::new();
        let mut input = self.input.lock().await;
        match input.read_line(&mut line).await {
            Ok(0) => log::debug!("stdin closed, continuing with test {}", next_run),
            Ok(_) => {}
            Err(e) => log::debug!("failed to read confirmation ({}), continuing", e),
        }
    }
}

/// Advances immediately without asking.
pub struct AutoAdvance;

#[async_trait]
impl ConfirmPrompt for AutoAdvance {
    async fn wait_for_advance(&self, next_run: u32) {
        log::debug!("auto-advancing to test {}", next_run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text() {
        assert_eq!(prompt_text(2), "Press Enter to run test 2 or Ctrl+C to stop...");
    }

    #[tokio::test]
    async fn test_line_prompt_consumes_one_line() {
        let input: &[u8] = b"\nsecond\n";
        let prompt = LinePrompt::new(input, Vec::new());
        prompt.wait_for_advance(2).await;
        let mut rest = String::new();
        prompt.input.lock().await.read_line(&mut rest).await.unwrap();
        assert_eq!(rest, "second\n");
    }

    #[tokio::test]
    async fn test_line_prompt_writes_prompt() {
        let input: &[u8] = b"\n";
        let prompt = LinePrompt::new(input, Vec::new());
        prompt.wait_for_advance(7).await;
        let written = String::from_utf8(prompt.into_output()).unwrap();
        assert_eq!(written, "Press Enter to run test 7 or Ctrl+C to stop...");
    }

    #[tokio::test]
    async fn test_line_prompt_eof_advances() {
        let input: &[u8] = b"";
        let prompt = LinePrompt::new(input, Vec::new());
        // Must return rather than hang
        prompt.wait_for_advance(3).await;
        prompt.wait_for_advance(4).await;
    }

    #[tokio::test]
    async fn test_auto_advance() {
        AutoAdvance.wait_for_advance(2).await;
    }
}
