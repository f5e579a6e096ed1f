//! QLM Daemon - duck-themed chat-completion service.
//!
//! Serves an OpenAI-compatible API that always answers with duck sounds.

use anyhow::{Context, Result};
use clap::Parser;
use qlm_common::config::QlmConfig;
use qlm_common::selector::ResponseSelector;
use qlmd::server::{self, AppState};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qlmd")]
#[command(about = "Quack Language Model daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (overrides the default search)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => QlmConfig::load_from(path)?,
        None => QlmConfig::load()?,
    };

    info!("QLM Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    // Selector construction validates the catalog and override probability.
    // A bad configuration must stop the daemon before it binds.
    let selector = ResponseSelector::standard(
        config.selector.recency_window,
        config.selector.rare_override_probability,
    )
    .context("Invalid selector configuration")?;

    info!(
        "Catalog ready: {} sounds, total weight {:.3}",
        selector.catalog().len(),
        selector.catalog().total_weight()
    );

    server::run(AppState::new(selector, config)).await
}
