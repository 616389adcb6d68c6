// This is the entry point for the image converter service.
// The lib.rs file exposes the same modules for tests and embedding.

use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use image_converter_lib::{AppState, config, server};

/// Batch-convert a directory of images over HTTP.
#[derive(Debug, Parser)]
#[command(name = "image-converter", version)]
struct Args {
    /// Path to a TOML config file (default: ./image-converter.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides config and environment
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides config and environment
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg = config::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        cfg.server.host = host;
    }
    if let Some(port) = args.port {
        cfg.server.port = port;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_level.0))
        .context("Invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stdout)
        .compact()
        .init();

    info!("=== Image Converter {} Starting ===", image_converter_lib::version());
    debug!("Config: {:?}", cfg);

    let (host, port) = (cfg.server.host.clone(), cfg.server.port);
    let state = AppState::new(cfg)?;
    server::serve(&host, port, state).await
}
