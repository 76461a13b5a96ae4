//! HTTP surface for purchase-order reading.
//!
//! - `POST /upload` takes a `multipart/form-data` body with one `file` part and
//!   answers with the parsed order as JSON
//! - `GET /healthz` answers `{"status":"ok"}`

pub mod error;
pub mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use poreader_core::Pipeline;
use poreader_core::models::config::ServerConfig;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ServerError};
pub use upload::AppState;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn healthz() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the application router.
pub fn build_router(pipeline: Arc<Pipeline>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/upload", post(upload::upload))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        // The upload form is served from another origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pipeline })
}

/// Bind `config.host:config.port` and serve until Ctrl-C.
pub async fn serve(pipeline: Arc<Pipeline>, config: &ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{}:{}", config.host, config.port),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
    tracing::info!(%local_addr, "poreader server listening");

    axum::serve(listener, build_router(pipeline, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl-C received, draining connections"),
        Err(error) => {
            tracing::warn!(%error, "failed to capture Ctrl-C signal");
            std::future::pending::<()>().await;
        }
    }
}
