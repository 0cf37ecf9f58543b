//! Geo data server.
//!
//! Serves world and per-country admin boundary files, optionally
//! pre-compressed, plus feature count / bounding box metadata.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geo_api::api::{cors_layer, router, AppState};
use geo_api::config::Config;
use geo_api::data::DataStore;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "geo-api-server")]
#[command(about = "Geographic boundary data server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory holding the geo data files (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(data_dir) = args.data_dir {
        config.data.base_dir = data_dir;
    }

    info!("Geo API Server");
    info!("Data directory: {}", config.data.base_dir.display());

    let store = DataStore::new(&config.data.base_dir);
    match store.list_admin_countries().await {
        Ok(countries) => info!("{} admin boundary files available", countries.len()),
        Err(e) => tracing::warn!("Could not list admin boundary files: {}", e),
    }

    let cors = cors_layer(&config.server.cors_origins).context("Invalid CORS origin")?;
    let app = router(Arc::new(AppState::new(store)), cors);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}
