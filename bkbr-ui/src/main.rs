//! bkbr-ui - local recipe browse/search service
//!
//! Serves the recipe collection and cached images over a loopback HTTP API,
//! and fetches new recipes by URL through the shared import pipeline.

use anyhow::{Context, Result};
use bkbr_common::config::{resolve_root_folder, ConfigOrigin, StoragePaths, TomlConfig};
use bkbr_common::RecipeStore;
use bkbr_fetch::RecipeImporter;
use bkbr_ui::{build_router, AppState};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for bkbr-ui
#[derive(Parser, Debug)]
#[command(name = "bkbr-ui")]
#[command(about = "Browse and search locally saved recipes")]
#[command(version)]
struct Args {
    /// Port to listen on (loopback only)
    #[arg(short, long, env = "BKBR_PORT")]
    port: Option<u16>,

    /// Root folder holding recipes.json and images/
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: <config dir>/backburner/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scraping service base URL
    #[arg(long, env = "BKBR_SCRAPE_URL")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, origin) = TomlConfig::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting Backburner browser (bkbr-ui) v{}", env!("CARGO_PKG_VERSION"));
    match &origin {
        ConfigOrigin::Missing(_) => warn!("Configuration: {}", origin),
        _ => info!("Configuration: {}", origin),
    }

    if let Some(endpoint) = args.endpoint {
        config.scrape.base_url = endpoint;
    }
    let port = args.port.unwrap_or(config.server.port);

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    let paths = StoragePaths::new(root_folder);
    paths
        .ensure_directories()
        .with_context(|| format!("Failed to initialize root folder {}", paths.root().display()))?;
    info!("Root folder: {}", paths.root().display());

    let store = Arc::new(RecipeStore::new(paths.recipes_file()));
    info!("✓ {} recipes in {}", store.load().len(), store.path().display());

    let importer = RecipeImporter::from_config(&config.scrape, &paths, store)
        .context("Failed to create HTTP clients")?;
    info!("Scrape endpoint: {} {}/scrape", config.scrape.method, config.scrape.base_url);

    let state = AppState::new(Arc::new(importer), &paths);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("bkbr-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
