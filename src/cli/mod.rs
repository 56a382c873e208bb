//! CLI module for flakeloop - command-line flags.
//!
//! Every flag overrides the matching config file value.

pub mod commands;

pub use commands::Cli;
