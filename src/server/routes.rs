//! Router configuration for the crawl service.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/crawl", post(handlers::crawl_site))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
