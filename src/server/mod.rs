//! HTTP surface: router, shared state and the listener loop.

pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{any, get},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::FundProvider;
use crate::core::config::AppConfig;

/// State shared by all handlers. Both parts are read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn FundProvider>,
    pub config: Arc<AppConfig>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/fund-nav", get(handlers::fund_nav))
        .route("/api/cron", any(handlers::cron))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.server.bind_address.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Serving fund NAV API on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .await
        .context("Server terminated unexpectedly")
}
