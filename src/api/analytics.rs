//! Analytics read endpoints.
//!
//! Two deliberately distinct operations: the per-link detail view has
//! no time window, while the global overview only looks at the last
//! 30 days. Both recompute from raw click rows on every call.

use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::analytics::{aggregate_global, aggregate_link, GlobalAnalytics, LinkAnalytics};
use crate::api::error::ApiError;
use crate::api::handlers::AppState;

/// Reporting window for the global overview.
pub const GLOBAL_WINDOW_DAYS: i64 = 30;

/// `GET /api/analytics/{shortCode}` — detail view for one link.
pub async fn link_analytics(
    State(state): State<Arc<AppState>>,
    Path(short_code): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<LinkAnalytics>, ApiError> {
    let key = state.client_key(&headers, addr);
    if !state.analytics_limiter.admit(&key) {
        return Err(ApiError::RateLimited);
    }

    let link = state
        .storage
        .find_by_code(&short_code)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NotFound)?;

    let clicks = state
        .storage
        .clicks_for_link(link.id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(aggregate_link(&link, &clicks)))
}

/// `GET /api/analytics` — overview across all links, last 30 days.
pub async fn global_analytics(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<GlobalAnalytics>, ApiError> {
    let key = state.client_key(&headers, addr);
    if !state.analytics_limiter.admit(&key) {
        return Err(ApiError::RateLimited);
    }

    let cutoff = chrono::Utc::now().timestamp() - GLOBAL_WINDOW_DAYS * 86_400;

    let links = state
        .storage
        .list_links()
        .await
        .map_err(ApiError::Internal)?;
    let clicks = state
        .storage
        .clicks_since(cutoff)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(aggregate_global(&links, &clicks)))
}
