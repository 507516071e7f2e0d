//! Console CLI
//!
//! Command-line interface for the LoRaWAN network monitoring console.

use std::path::PathBuf;

use clap::Parser;
use console::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "console")]
#[command(about = "LoRaWAN network monitoring console")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, log_level={:?}",
        args.config,
        args.port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.apply_env();

    if let Some(port) = args.port {
        config.dashboard.port = port;
    }

    tracing::info!("Starting console service");
    tracing::debug!(
        "Refresh interval: {}ms, message limit: {}, dashboard enabled: {}",
        config.refresh_interval_ms,
        config.message_limit,
        config.dashboard.enabled
    );

    console::run(config).await?;

    Ok(())
}
