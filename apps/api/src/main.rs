mod config;
mod errors;
mod extract;
mod models;
mod ner;
mod routes;
mod state;
mod storage;
mod webhook;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ner::HuggingFaceNer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::CsvStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_name, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Intake API v{}", env!("CARGO_PKG_VERSION"));

    // Media directory for inbound PDFs
    std::fs::create_dir_all(&config.media_dir)?;

    // CSV store
    let store = Arc::new(CsvStore::new(&config.csv_path));
    info!("CSV store at {}", store.path().display());

    // NER client — created once and shared read-only across requests
    let ner = Arc::new(HuggingFaceNer::new(config.hf_api_token.clone()));
    info!("NER client initialized");

    // Shared HTTP client for Twilio media downloads
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    // Build app state
    let state = AppState {
        store,
        ner,
        http,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
