//! HTTP surface: routes, shared state and the server loop

use std::num::NonZeroU16;
use std::sync::Arc;

use axum::Router;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::render::FontSet;

mod placeholder;
mod prelude;

use placeholder::placeholder_handler;
use prelude::*;

/// State shared by every request; fonts are read-only after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    fonts: Arc<FontSet>,
    jpeg_quality: u8,
}

impl AppState {
    /// Wraps the loaded fonts and encoder settings for the router.
    pub fn new(fonts: FontSet, jpeg_quality: u8) -> Self {
        Self {
            fonts: Arc::new(fonts),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Placeholder Image Generator API",
        "endpoints": {
            "/placeholder": "GET - Generate placeholder image from text (prompt, width, height, return_file)",
            "/health": "GET - Health check"
        }
    }))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Builds the router with CORS open to any origin.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", axum::routing::get(root_handler))
        .route("/health", axum::routing::get(health_handler))
        .route("/placeholder", axum::routing::get(placeholder_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Binds the listener and serves until Ctrl-C.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    state: AppState,
) -> Result<(), anyhow::Error> {
    let app = create_router(state);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
