//! # Feedback Board Binary
//!
//! The entry point that assembles the adapters and services into the running
//! server.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{build_router, AppState};
use auth_adapters::{Argon2Hasher, HexTokenSource};
use configs::AppConfig;
use domains::CollectionStore;
use services::{FeedbackService, IdentityService};
use storage_adapters::JsonFileStore;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;

    // 1. Storage: whole-document JSON collections under the data directory
    let store: Arc<dyn CollectionStore> = Arc::new(JsonFileStore::new(&config.data_dir));

    // 2. Services over the ports
    let identity = IdentityService::new(
        store.clone(),
        Arc::new(Argon2Hasher),
        Arc::new(HexTokenSource),
    );
    let feedback = FeedbackService::new(store.clone());

    // 3. HTTP surface
    let state = Arc::new(AppState { identity, feedback, store });
    let app = build_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server is running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("Received Ctrl+C, shutting down");
}
