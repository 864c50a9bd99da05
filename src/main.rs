//! Listing Profit Simulator — Entry Point
//!
//! Initializes configuration, logging, rule tables and the listing store,
//! then serves the HTTP API until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (or $LISTING_SIM_CONFIG) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Build rule tables (built-in catalog + [rules] overrides)
//! 4. Open the JSON listing store
//! 5. Create metrics registry and use-case services
//! 6. Serve the API (routes + /live + /ready + /metrics) until SIGINT,
//!    then shut down gracefully; a server failure exits with an error

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use listing_profit_sim::adapters::api::{ApiServer, AppState};
use listing_profit_sim::adapters::metrics::MetricsRegistry;
use listing_profit_sim::adapters::persistence::JsonListingStore;
use listing_profit_sim::config::loader::{config_path, load_config};
use listing_profit_sim::domain::rules::RuleTables;
use listing_profit_sim::usecases::{ListingManager, SimulatorService};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let path = config_path();
    let config = load_config(&path).context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %path,
        "Starting listing profit simulator"
    );

    // ── 3. Rule tables ──────────────────────────────────────
    let tables = Arc::new(
        RuleTables::with_overrides(&config.rules).context("Failed to build rule tables")?,
    );
    info!(
        marketplaces = tables.marketplaces().len(),
        shipping_methods = tables.shipping_methods().len(),
        packaging_materials = tables.packaging_materials().len(),
        "Rule tables ready"
    );

    // ── 4. Listing store ────────────────────────────────────
    let store = Arc::new(
        JsonListingStore::open(&config.persistence.data_dir)
            .await
            .context("Failed to open listing store")?,
    );

    // ── 5. Metrics + use cases ──────────────────────────────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    let state = AppState {
        simulator: Arc::new(SimulatorService::new(Arc::clone(&tables), Arc::clone(&store))),
        listings: Arc::new(ListingManager::new(Arc::clone(&store))),
        metrics,
    };

    // ── 6. Serve until SIGINT ───────────────────────────────
    // A server that stops on its own ends the process with an error.
    let server = ApiServer::new(state, config.server.bind_address.clone());
    server
        .serve_until(async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for SIGINT");
                std::future::pending::<()>().await;
            }
            info!("SIGINT received, initiating graceful shutdown");
        })
        .await
        .context("API server exited")?;

    info!("Shutdown complete");
    Ok(())
}
