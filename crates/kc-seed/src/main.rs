//! # kc-seed
//!
//! Seeds a Keycloak realm with synthetic users.

#![forbid(unsafe_code)]

use std::sync::Arc;

use clap::Parser;
use kc_seed::{
    output::error,
    seed::{seed, SeedOptions},
    AdminClient, Cli, SeedConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env before clap reads environment fallbacks
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "kc_seed=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match SeedConfig::from_raw(cli.raw_config()) {
        Ok(c) => c,
        Err(e) => {
            error(&e.to_string());
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "Loaded configuration");

    let api = match AdminClient::new(&config) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            error(&e.to_string());
            std::process::exit(1);
        }
    };

    let options = SeedOptions {
        show_progress: !cli.quiet,
    };

    if let Err(e) = seed(api, &config, options).await {
        error(&e.to_string());
        std::process::exit(1);
    }
}
