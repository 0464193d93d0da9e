//! Prospector CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use prospector::cli::{commands, Cli, Commands};
use prospector::domain::models::Config;
use prospector::infrastructure::config::ConfigLoader;
use prospector::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        prospector::cli::handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging).with_verbose(cli.verbose))
        .context("Failed to initialize logging")?;
    debug!(backend = config.backend.kind.as_str(), "configuration loaded");

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Commands::Simulate(args) => {
            commands::simulate::execute(args, &config, &cancel, cli.json).await
        }
        Commands::Strategy(args) => commands::strategy::execute(&args, cli.json),
        Commands::Validate { file } => commands::validate::execute(&file, cli.json),
        Commands::Config(args) => commands::config::execute(&args, &config, cli.json),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
