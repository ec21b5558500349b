//! Courier CLI
//!
//! Terminal front-end for submitting and monitoring jobs on a job service.

mod commands;
mod config;
mod id_resolver;
mod router;
#[cfg(test)]
mod testing;
mod views;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::{Config, DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT_SECS};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Submit and monitor jobs on a job service", long_about = None)]
struct Cli {
    /// Job service base URL
    #[arg(long, env = "COURIER_SERVICE_URL", default_value = DEFAULT_SERVICE_URL, global = true)]
    service_url: String,

    /// HTTP timeout in seconds
    #[arg(long, env = "COURIER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    /// Log requests and view transitions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "courier=debug,courier_client=debug,courier_core=debug"
    } else {
        "courier=warn,courier_client=warn,courier_core=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        service_url: cli.service_url,
        timeout: Duration::from_secs(cli.timeout),
    };
    config.validate()?;

    tracing::debug!("Using job service at {}", config.service_url);

    handle_command(cli.command, &config).await
}
