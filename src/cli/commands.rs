//! CLI definition using clap.

use clap::Parser;
use std::path::PathBuf;

use flakeloop::notify::NotifierKind;

/// flakeloop - re-run a flaky test command until it settles
#[derive(Parser, Debug)]
#[command(name = "flakeloop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Stop after this many consecutive passing runs
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_greens: Option<u32>,

    /// Stop after this many consecutive failing runs
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_fails: Option<u32>,

    /// Never run more than this many times
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_runs: Option<u32>,

    /// Output substring that marks a run as failed
    #[arg(short, long)]
    pub marker: Option<String>,

    /// Kill a run after this many seconds and count it as failed
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Directory to run the command in
    #[arg(short = 'C', long = "dir")]
    pub working_dir: Option<PathBuf>,

    /// How to announce each run
    #[arg(short, long, value_enum)]
    pub notifier: Option<NotifierKind>,

    /// Start the next run without waiting for Enter
    #[arg(short = 'y', long)]
    pub no_confirm: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 when stopping on a fail streak
    #[arg(long)]
    pub strict_exit: bool,

    /// Test command to run (default: npm test)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// The trailing command words quoted back into one shell line.
    pub fn command_line(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(shell_words::join(&self.command))
        }
    }
}
