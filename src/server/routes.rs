//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/summarize", post(handlers::summarize))
        .route("/api/ask", post(handlers::ask))
        .route("/api/followup", post(handlers::followup))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
