//! Client IP extraction from HTTP headers.
//!
//! Prefers the common proxy headers, then the socket remote address.
//! Returns `None` when nothing usable is available; callers fall back
//! to the shared `unknown` bucket for rate limiting and store no IP on
//! the click event.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Determine the client IP for a request.
///
/// - first entry of `x-forwarded-for`, if parseably non-empty
/// - `x-real-ip`
/// - the socket address, unless it is loopback or unspecified (a
///   loopback socket peer means the real client is behind a proxy that
///   did not forward an address)
pub fn client_ip(headers: &HeaderMap, socket_addr: Option<SocketAddr>) -> Option<String> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(ip) = xff.split(',').next().map(str::trim) {
            if !ip.is_empty() {
                return Some(ip.to_string());
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return Some(real_ip.to_string());
        }
    }

    let addr = socket_addr?;
    let ip = addr.ip();
    if ip.is_loopback() || ip.is_unspecified() {
        return None;
    }

    Some(ip.to_string())
}
