//! Test command execution.
//!
//! - `CommandRunner`: the seam the run controller calls once per run
//! - `ShellCommandRunner`: runs a command line through `sh -c`
//! - `classify`: turns a command's result into a `RunOutcome`

mod classify;
mod shell;
mod traits;

pub use classify::{DEFAULT_FAILURE_MARKER, classify};
pub use shell::{DEFAULT_TEST_COMMAND, ShellCommandRunner, ShellConfig};
pub use traits::{CommandOutput, CommandRunner, ExecutionError};
