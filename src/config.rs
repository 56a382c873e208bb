use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use flakeloop::domain::TerminationPolicy;
use flakeloop::domain::policy::{
    DEFAULT_MAX_CONSECUTIVE_FAILS, DEFAULT_MAX_CONSECUTIVE_GREENS, DEFAULT_MAX_RUNS,
};
use flakeloop::execution::{DEFAULT_FAILURE_MARKER, DEFAULT_TEST_COMMAND, ShellConfig};
use flakeloop::notify::NotifierKind;

use crate::cli::Cli;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Command line handed to `sh -c` for every run.
    pub command: String,

    /// Substring that marks a run as failed.
    #[serde(rename = "failure-marker")]
    pub failure_marker: String,

    #[serde(rename = "max-greens")]
    pub max_greens: u32,

    #[serde(rename = "max-fails")]
    pub max_fails: u32,

    #[serde(rename = "max-runs")]
    pub max_runs: u32,

    /// Per-run limit in seconds. Unset means wait forever.
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    #[serde(rename = "working-dir")]
    pub working_dir: Option<PathBuf>,

    pub notifier: NotifierKind,

    /// Wait for Enter between runs.
    pub confirm: bool,

    /// Exit 1 when the session ends on a fail streak.
    #[serde(rename = "strict-exit")]
    pub strict_exit: bool,

    #[serde(rename = "log-level")]
    pub log_level: String,

    #[serde(rename = "log-file")]
    pub log_file: Option<PathBuf>,

    /// File this config was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: DEFAULT_TEST_COMMAND.to_string(),
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
            max_greens: DEFAULT_MAX_CONSECUTIVE_GREENS,
            max_fails: DEFAULT_MAX_CONSECUTIVE_FAILS,
            max_runs: DEFAULT_MAX_RUNS,
            timeout_secs: None,
            working_dir: None,
            notifier: NotifierKind::default(),
            confirm: true,
            strict_exit: false,
            log_level: "info".to_string(),
            log_file: None,
            source: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// 1. Explicit path if provided
    /// 2. ./flakeloop.yml
    /// 3. ~/.config/flakeloop/flakeloop.yml
    /// 4. Defaults
    ///
    /// Runs before the logger exists, so failures on the implicit paths are
    /// returned rather than logged.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        let project_config = PathBuf::from(format!("{}.yml", project_name));
        if project_config.exists() {
            return Self::load_from_file(&project_config)
                .context(format!("Failed to load config from {}", project_config.display()));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                return Self::load_from_file(&user_config)
                    .context(format!("Failed to load config from {}", user_config.display()));
            }
        }

        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let mut config: Self =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.source = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    /// Command-line flags win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(command) = cli.command_line() {
            self.command = command;
        }
        if let Some(marker) = &cli.marker {
            self.failure_marker = marker.clone();
        }
        if let Some(n) = cli.max_greens {
            self.max_greens = n;
        }
        if let Some(n) = cli.max_fails {
            self.max_fails = n;
        }
        if let Some(n) = cli.max_runs {
            self.max_runs = n;
        }
        if let Some(secs) = cli.timeout {
            self.timeout_secs = Some(secs);
        }
        if let Some(dir) = &cli.working_dir {
            self.working_dir = Some(dir.clone());
        }
        if let Some(kind) = cli.notifier {
            self.notifier = kind;
        }
        if cli.no_confirm {
            self.confirm = false;
        }
        if cli.strict_exit {
            self.strict_exit = true;
        }
        if cli.is_verbose() {
            self.log_level = "debug".to_string();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            eyre::bail!("command must not be empty");
        }
        if self.failure_marker.is_empty() {
            eyre::bail!("failure-marker must not be empty");
        }
        if self.timeout_secs == Some(0) {
            eyre::bail!("timeout-secs must be > 0");
        }
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| eyre::eyre!("unknown log-level: {}", self.log_level))?;
        self.policy()?;
        Ok(())
    }

    pub fn policy(&self) -> Result<TerminationPolicy> {
        TerminationPolicy::new(self.max_greens, self.max_fails, self.max_runs)
            .context("Invalid thresholds")
    }

    pub fn shell_config(&self) -> ShellConfig {
        let mut shell = ShellConfig::new(&self.command);
        if let Some(dir) = &self.working_dir {
            shell = shell.with_working_dir(dir);
        }
        if let Some(secs) = self.timeout_secs {
            shell = shell.with_timeout(Duration::from_secs(secs));
        }
        shell
    }
}
