use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::analytics::{global_analytics, link_analytics};
use super::handlers::{health_check, shorten, AppState};

pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/shorten", post(shorten))
        .route("/api/analytics", get(global_analytics))
        .route("/api/analytics/{short_code}", get(link_analytics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
