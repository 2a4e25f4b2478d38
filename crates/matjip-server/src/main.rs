//! Matjip server binary
//!
//! Starts the HTTP server for caption parsing, geocoding and place storage.

use anyhow::Context;
use clap::Parser;
use matjip_server::{config::ServerConfig, start_server};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "matjip_server=info,matjip_extractor=info,matjip_geocoder=info,\
matjip_llm=info,matjip_store=info,tower_http=info";

/// Caption-to-place extraction service
#[derive(Debug, Parser)]
#[command(name = "matjip-server", version, about)]
struct Cli {
    /// Load configuration from a TOML file
    #[arg(short, long, env = "MATJIP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            warn!("No config file specified, using defaults");
            ServerConfig::default()
        }
    };
    config.apply_env();

    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.bind_port = port;
    }

    start_server(config).await?;
    Ok(())
}
