//! bkbr-fetch - one-shot recipe import
//!
//! Takes a single recipe page URL (for example handed over by a share
//! action), runs it through the scraping service, caches the hero image and
//! appends the recipe to the local store, then exits.

use anyhow::{Context, Result};
use bkbr_common::config::{
    resolve_root_folder, ConfigOrigin, ScrapeMethod, StoragePaths, TomlConfig,
};
use bkbr_common::RecipeStore;
use bkbr_fetch::RecipeImporter;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for bkbr-fetch
#[derive(Parser, Debug)]
#[command(name = "bkbr-fetch")]
#[command(about = "Fetch a recipe through the scraping service and save it locally")]
#[command(version)]
struct Args {
    /// Recipe page URL
    url: String,

    /// Root folder holding recipes.json and images/
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: <config dir>/backburner/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scraping service base URL
    #[arg(long, env = "BKBR_SCRAPE_URL")]
    endpoint: Option<String>,

    /// How the URL is sent to the scraping service (get or post)
    #[arg(long)]
    method: Option<ScrapeMethod>,

    /// Print the saved recipe as JSON instead of a summary line
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Failed to fetch recipe: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let (mut config, origin) = TomlConfig::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("bkbr-fetch v{}", env!("CARGO_PKG_VERSION"));
    match &origin {
        ConfigOrigin::Missing(_) => warn!("Configuration: {}", origin),
        _ => info!("Configuration: {}", origin),
    }

    if let Some(endpoint) = args.endpoint {
        config.scrape.base_url = endpoint;
    }
    if let Some(method) = args.method {
        config.scrape.method = method;
    }

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    let paths = StoragePaths::new(root_folder);
    paths
        .ensure_directories()
        .with_context(|| format!("Failed to initialize root folder {}", paths.root().display()))?;
    info!("Root folder: {}", paths.root().display());
    info!("Scrape endpoint: {} {}/scrape", config.scrape.method, config.scrape.base_url);

    let store = Arc::new(RecipeStore::new(paths.recipes_file()));
    let importer = RecipeImporter::from_config(&config.scrape, &paths, store)
        .context("Failed to create HTTP clients")?;

    let recipe = importer.import(&args.url).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        println!(
            "Saved recipe '{}' (id {}){}",
            recipe.title,
            recipe.id.unwrap_or_default(),
            recipe
                .local_image
                .as_deref()
                .map(|f| format!(", image {}", f))
                .unwrap_or_default()
        );
    }

    Ok(())
}
