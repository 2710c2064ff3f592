//! Command-line entry point for **dnspin**
//!
//! * Reads all settings from the environment (`CF_API_TOKEN`, …)
//! * Sets up tracing with a compact formatter
//! * Boots the reconciliation loop defined in `dnspin_core`

use anyhow::Result;
use clap::Parser;
use dnspin_core::{load_config, run_once, run_scheduler};
use dnspin_provider_cloudflare::CloudflareProvider;
use std::sync::Arc;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// CLI options
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Run a single reconciliation cycle and exit instead of scheduling
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tokio_cron_scheduler=warn")),
        )
        .with(fmt::layer().compact())
        .init();

    let cfg = load_config()?;
    let provider = Arc::new(CloudflareProvider::new(&cfg.api_token, &cfg.zone_id)?);

    if cli.once {
        run_once(cfg, provider).await?;
        Ok(())
    } else {
        run_scheduler(cfg, provider).await
    }
}
