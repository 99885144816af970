//! HTTP boundary
//!
//! Axum REST API over the inference engine, mirroring the service
//! contract: `POST /api/chat`, `POST /api/set-api-key`, `GET /api/health`,
//! and optional static hosting of a built frontend.

pub mod error;
pub mod keys;
pub mod routes;
pub mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::signal;
use tower_http::services::ServeDir;

pub use error::{ApiError, ApiResult};
pub use keys::{ApiKeyStore, InMemoryKeyStore};
pub use state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(routes::chat))
        .route("/api/set-api-key", post(routes::set_api_key))
        .route("/api/health", get(routes::health))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
///
/// When `static_dir` is given, anything outside `/api` is served from it,
/// with directory requests resolving to their index.html.
pub async fn serve(addr: &str, state: AppState, static_dir: Option<PathBuf>) -> Result<()> {
    let mut app = router(state);

    if let Some(dir) = static_dir {
        tracing::info!("Serving static assets from {:?}", dir);
        app = app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// Resolves when ctrl-c is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
