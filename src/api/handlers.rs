use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::analytics::client_ip;
use crate::api::error::ApiError;
use crate::api::{qr, validate};
use crate::limiter::{RateLimiter, UNKNOWN_CLIENT};
use crate::models::Link;
use crate::storage::{Storage, StorageError};

pub const SHORT_CODE_LEN: usize = 8;

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    /// Public base URL, no trailing slash.
    pub base_url: String,
    pub shorten_limiter: RateLimiter,
    pub analytics_limiter: RateLimiter,
}

impl AppState {
    /// Rate-limit key for a request: the client IP, or the shared
    /// `unknown` bucket when no address is discernible.
    pub fn client_key(&self, headers: &HeaderMap, addr: SocketAddr) -> String {
        client_ip(headers, Some(addr)).unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub success: bool,
    pub data: ShortenData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenData {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    /// Base64 SVG data URL encoding `short_url`.
    pub qr_code: String,
}

/// Generate a random short code candidate. Uniqueness is enforced by
/// the store; callers retry on conflict.
fn generate_short_code() -> String {
    use rand::distr::Alphanumeric;
    use rand::RngExt;

    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_CODE_LEN)
        .map(char::from)
        .collect()
}

/// Create a short link for a submitted URL.
///
/// A URL that was already shortened returns the existing code instead
/// of creating a duplicate row; the QR image is simply re-rendered,
/// which is idempotent. New URLs get a random code, retrying
/// generation for as long as the store reports a collision.
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, ApiError> {
    let key = state.client_key(&headers, addr);
    if !state.shorten_limiter.admit(&key) {
        return Err(ApiError::RateLimited);
    }

    let url = validate::shorten_url(&payload.url).map_err(ApiError::Validation)?;

    if let Some(existing) = state
        .storage
        .find_by_original_url(&url)
        .await
        .map_err(ApiError::Internal)?
    {
        return Ok(Json(shorten_response(&state.base_url, existing)?));
    }

    let link = loop {
        let code = generate_short_code();
        match state.storage.create_link(&code, &url).await {
            Ok(link) => break link,
            Err(StorageError::Conflict) => {
                tracing::debug!(short_code = %code, "short code collision, regenerating");
            }
            Err(StorageError::Other(err)) => return Err(ApiError::Internal(err)),
        }
    };

    Ok(Json(shorten_response(&state.base_url, link)?))
}

fn shorten_response(base_url: &str, link: Link) -> Result<ShortenResponse, ApiError> {
    let short_url = format!("{}/r/{}", base_url, link.short_code);
    let qr_code = qr::data_url(&short_url).map_err(ApiError::Internal)?;

    Ok(ShortenResponse {
        success: true,
        data: ShortenData {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            short_url,
            qr_code,
        },
    })
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
    }

    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
