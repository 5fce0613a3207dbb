use axum::extract::{ConnectInfo, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

use crate::analytics::{classifier, client_ip, CountryLookup};
use crate::models::NewClick;
use crate::storage::Storage;

pub struct RedirectState {
    pub storage: Arc<dyn Storage>,
    pub country_lookup: Arc<CountryLookup>,
}

#[derive(Debug, Error)]
enum RedirectError {
    #[error("unknown short code")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

const NOT_FOUND_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Link not found</title></head>
<body style="font-family: sans-serif; text-align: center; margin-top: 4rem;">
<h1>404</h1>
<p>This short link does not exist.</p>
</body>
</html>
"#;

/// Resolve a short code, capture the click, and redirect.
///
/// Errors are threaded as values through each step and collapsed to the
/// friendly not-found page here at the boundary; a storage fault never
/// surfaces as a 500 to a link visitor.
pub async fn redirect_url(
    State(state): State<Arc<RedirectState>>,
    Path(code): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    match resolve_and_capture(&state, &code, addr, &headers).await {
        Ok(destination) => Redirect::temporary(&destination).into_response(),
        Err(RedirectError::NotFound) => not_found_page(),
        Err(RedirectError::Storage(err)) => {
            tracing::error!(short_code = %code, "redirect lookup failed: {err:#}");
            not_found_page()
        }
    }
}

/// The capture sequence behind a redirect:
///
/// 1. resolve the link (absent -> NotFound, nothing written)
/// 2. classify device/browser from the user-agent
/// 3. best-effort country lookup, bounded by the lookup's own timeout
/// 4. persist the click; failure is logged and swallowed so the
///    visitor still gets their redirect
async fn resolve_and_capture(
    state: &RedirectState,
    code: &str,
    addr: SocketAddr,
    headers: &HeaderMap,
) -> Result<String, RedirectError> {
    let link = state
        .storage
        .find_by_code(code)
        .await?
        .ok_or(RedirectError::NotFound)?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let ip = client_ip(headers, Some(addr));

    let country = match ip.as_deref() {
        Some(ip) => state.country_lookup.country(ip).await,
        None => None,
    };

    let click = NewClick {
        link_id: link.id,
        ip,
        device: classifier::device(&user_agent).to_string(),
        browser: classifier::browser(&user_agent).to_string(),
        user_agent,
        referrer,
        country,
    };

    if let Err(err) = state.storage.record_click(&click).await {
        tracing::warn!(short_code = %code, error = %err, "failed to record click, redirecting anyway");
    }

    Ok(link.original_url)
}

fn not_found_page() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
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
