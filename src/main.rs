mod calendar;
mod config;
mod errors;
mod feeds;
mod models;
mod pipeline;
mod pricing;
mod report;
mod server;
mod state;

use crate::feeds::fred::FredClient;
use crate::state::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("rusty_fedwatch starting");

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    // Inputs are materialized once; the pipeline never reads files.
    let meetings = match feeds::files::load_meeting_dates(&cfg.fomc_dates_path) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("meeting dates error: {e}");
            std::process::exit(1);
        }
    };

    let prices = match feeds::files::load_contract_dir(&cfg.contracts_dir) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("contract prices error: {e}");
            std::process::exit(1);
        }
    };

    if prices.is_empty() {
        tracing::warn!(dir = %cfg.contracts_dir.display(), "no contract price files found");
    }

    let fred = cfg
        .fred_api_key
        .as_deref()
        .map(|key| FredClient::new(&cfg.fred_base_url, key));
    if fred.is_none() {
        tracing::warn!("FRED_API_KEY not set, rate labels require explicit lower/upper");
    }

    let port = cfg.server_port;
    let app_state = AppState::new(cfg, meetings, Arc::new(prices), fred);
    let app = server::router(app_state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
