//! # Overlay Runtime
//!
//! Runs the node discovery service as a line-oriented JSON server over
//! stdin/stdout. Logs go to stderr.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from `OV_CONFIG` (or defaults), then `OV_*` overrides
//! 3. Open the node store named by `database_url`
//! 4. Seed the cache from `OV_SEED_FILE`, if set
//! 5. Serve requests until stdin closes, then close the store

mod seed;
mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ov_01_node_discovery::{
    open_store, ApiHandler, DiscoveryConfig, DiscoveryMetrics, KeyValueStore, NodeCache,
    NodeDiscoveryService,
};

/// Load configuration from file and environment.
fn load_config() -> Result<DiscoveryConfig> {
    let mut config = match std::env::var("OV_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration");
            DiscoveryConfig::load(&path)?
        }
        Err(_) => DiscoveryConfig::default(),
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config().context("failed to load configuration")?;
    info!(
        database_url = %config.database_url,
        default_amount = config.default_amount,
        "Starting overlay runtime"
    );

    let store = open_store(&config.database_url).context("failed to open node store")?;
    let metrics = Arc::new(DiscoveryMetrics::new());
    let cache = NodeCache::new(Arc::clone(&store), Arc::clone(&metrics));

    if let Ok(path) = std::env::var("OV_SEED_FILE") {
        let count = seed::seed_cache(&cache, &PathBuf::from(path)).await?;
        info!(count, "Seeded node cache");
    }

    let service = NodeDiscoveryService::new(
        cache,
        config.selection.to_policy(),
        config.default_amount,
        Arc::clone(&metrics),
    );
    let handler = ApiHandler::new(service, metrics);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let served = serve::serve(&handler, stdin, tokio::io::stdout()).await?;

    info!(served, "Input closed, shutting down");
    store.close().await?;
    Ok(())
}
