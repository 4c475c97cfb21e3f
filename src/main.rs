// =============================================================================
// Stock Dashboard: Main Entry Point
// =============================================================================
//
// Serves price series enriched with SMA / RSI / MACD, company profiles and
// the manual comparison tools to the browser UI over HTTP/JSON. Series are
// fetched lazily on first request and cached per (symbol, period, interval).
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod cache;
mod comparison;
mod config;
mod error;
mod indicators;
mod market_data;
mod provider;
mod service;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::DashboardConfig;
use crate::provider::{MarketDataProvider, YahooClient};

const DEFAULT_CONFIG_PATH: &str = "dashboard_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Stock Dashboard starting up");

    let config_path =
        std::env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = DashboardConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        DashboardConfig::default()
    });
    config.apply_env_overrides();

    info!(
        symbols = ?config.symbols,
        default_period = %config.default_period,
        default_interval = %config.default_interval,
        eviction = ?config.cache.eviction,
        "Dashboard configured"
    );

    // ── 2. Provider & shared state ───────────────────────────────────────
    let provider: Arc<dyn MarketDataProvider> = Arc::new(
        YahooClient::new(&config.provider).context("failed to build market data client")?,
    );
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, provider));

    // ── 3. HTTP server ───────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            warn!("Shutdown signal received, stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("Stock Dashboard shut down complete.");
    Ok(())
}
