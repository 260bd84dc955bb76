//! Drift Sentinel — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.
//!
//! See `README.md` for quickstart.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drift_sentinel::config::ServiceConfig;
use drift_sentinel::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("drift_sentinel=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments. This enables
    // SENTINEL_CONFIG_PATH from .env so config.rs can pick it up.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = ServiceConfig::load_default().context("load service config")?;
    tracing::info!(
        bind = %cfg.bind_addr,
        history_capacity = cfg.history_capacity,
        rolling_window_hours = cfg.rolling_window_hours,
        "starting drift-sentinel"
    );

    let metrics = Metrics::init();
    let app = drift_sentinel::api::create_router(&cfg).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("bind {}", cfg.bind_addr))?;
    axum::serve(listener, app).await.context("serve")?;

    Ok(())
}
