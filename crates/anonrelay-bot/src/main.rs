//! Anonrelay bot entry point
//!
//! Reads events from stdin as `<user-id> <text>` lines and prints outbound
//! deliveries, driving the full engine end to end through the console
//! loopback transport.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use anonrelay_bot::{AppConfig, BotApp, Cli, ConsoleTransport, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.example_config {
        print!("{}", AppConfig::example_config());
        return Ok(());
    }

    setup_logging(cli.verbose);

    let mut config = load_configuration(&cli)?;
    if let Some(state_file) = &cli.state_file {
        config.state_file = state_file.into();
    }

    // Missing credential must stop the process before any request is served
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    let mut app = BotApp::new(config, ConsoleTransport::new());
    info!("anonrelay started, reading events from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        app.handle_line(&line).await?;
    }

    info!("input closed, shutting down");
    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();
}

/// Load configuration from file, defaults, and environment
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    if let Some(path) = &cli.config {
        info!("loading configuration from {}", path);
    }
    AppConfig::load(cli.config.as_deref())
}
