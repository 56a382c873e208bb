use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::sync::Arc;

mod cli;
mod config;

use cli::Cli;
use config::Config;
use flakeloop::execution::ShellCommandRunner;
use flakeloop::notify::build_notifier;
use flakeloop::prompt::{AutoAdvance, ConfirmPrompt, StdinPrompt};
use flakeloop::report;
use flakeloop::runner::RunController;

fn setup_logging(config: &Config) -> Result<()> {
    let level: log::LevelFilter = config
        .log_level
        .parse()
        .map_err(|_| eyre::eyre!("unknown log-level: {}", config.log_level))?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // RUST_LOG still wins over the configured level
    builder.parse_default_env();

    if let Some(log_file) = &config.log_file {
        if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }
        let target = Box::new(
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .context("Failed to open log file")?,
        );
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.init();
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<i32> {
    let policy = config.policy()?;
    let runner = Arc::new(ShellCommandRunner::new(config.shell_config()));
    let notifier = build_notifier(config.notifier);
    let confirm: Arc<dyn ConfirmPrompt> = if config.confirm {
        Arc::new(StdinPrompt::stdin())
    } else {
        Arc::new(AutoAdvance)
    };

    info!("Testing '{}' with notifier {:?}", config.command, config.notifier);

    let mut controller = RunController::new(policy, runner, notifier, confirm)
        .with_failure_marker(&config.failure_marker);
    let summary = controller.run().await;

    if cli.json {
        println!("{}", report::summary_json(&summary).context("Failed to serialize summary")?);
    } else {
        for line in report::render_summary(&summary, &policy) {
            println!("{}", line);
        }
    }

    let code = summary.exit_code(config.strict_exit);
    if code != 0 {
        eprintln!("{}", "Stopped on a fail streak, exiting with status 1".red());
    }
    Ok(code)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, then let flags override it
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);

    setup_logging(&config).context("Failed to setup logging")?;

    match &config.source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    config.validate().context("Invalid configuration")?;

    let code = run_application(&cli, &config).await.context("Application failed")?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
