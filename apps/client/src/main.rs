mod cache;
mod config;
mod data;
mod errors;
#[cfg(test)]
mod fixtures;
mod models;
mod routes;
mod service;
mod state;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::data::DataLayer;
use crate::routes::build_router;
use crate::service::HttpConnector;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Autohire client v{}", env!("CARGO_PKG_VERSION"));

    // One backend connector, one cached data layer per process.
    let connector = Arc::new(HttpConnector::new(config.backend_url.clone())?);
    info!("Backend connector targeting {}", config.backend_url);

    let state = AppState {
        data: Arc::new(DataLayer::new()),
        connector,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
