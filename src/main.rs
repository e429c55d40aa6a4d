use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

mod config;
mod dashboard;
mod models;
mod resolver;
mod telemetry;

use config::Config;
use dashboard::AppState;
use telemetry::{start_telemetry_poller, GameTelemetryPoller, SportsDataApi, SportsDataClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    let telemetry_config = config.telemetry();

    // Without a key there is nothing to call: the poller serves demo data.
    let api: Option<Arc<dyn SportsDataApi>> = match &telemetry_config.api_key {
        Some(key) => Some(Arc::new(SportsDataClient::new(
            &config.base_url(),
            key,
            &config.api_host,
            telemetry_config.request_timeout,
        )?)),
        None => None,
    };

    if telemetry_config.force_demo_mode {
        info!("🟡 DEMO mode forced – upstream will not be called");
    } else if api.is_none() {
        info!("🟡 No SPORTS_API_KEY configured – serving demo telemetry");
    } else {
        info!("🔴 LIVE mode – polling {} for {}", config.api_host, telemetry_config.team.abbr);
    }

    let initial_player = config.initial_player();
    let poller = Arc::new(GameTelemetryPoller::new(telemetry_config, api, &initial_player));
    let (selection_tx, selection_rx) = watch::channel(initial_player);

    let handle = start_telemetry_poller(Arc::clone(&poller), selection_rx);

    let app = dashboard::router(AppState {
        poller,
        selection: selection_tx,
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    handle.shutdown().await;
    Ok(())
}
