//! Best-effort IP-to-country lookup against an external HTTP endpoint.
//!
//! The endpoint is an opaque collaborator: every failure mode (timeout,
//! transport error, non-success status) degrades to `None` and is never
//! surfaced to the caller. Results are cached per IP for the process
//! lifetime so repeated clicks from one address cost one request.

use dashmap::DashMap;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

pub struct CountryLookup {
    client: Option<reqwest::Client>,
    base_url: String,
    /// IP string -> country. `Some(None)` records a known miss so we
    /// never retry an address that already failed.
    cache: DashMap<String, Option<String>>,
}

impl CountryLookup {
    /// `base_url` is the endpoint prefix, e.g. `https://ipapi.co`; the
    /// service is queried as `{base_url}/{ip}/country/` and replies
    /// with a bare country code.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder().timeout(timeout).build().ok();
        if client.is_none() {
            tracing::warn!("failed to build geo HTTP client, country enrichment disabled");
        }

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: DashMap::new(),
        }
    }

    /// Look up the country for `ip`. Returns `None` for private or
    /// unparseable addresses, known misses, and any request failure.
    pub async fn country(&self, ip: &str) -> Option<String> {
        if is_private(ip) {
            return None;
        }

        if let Some(entry) = self.cache.get(ip) {
            return entry.clone();
        }

        let result = self.fetch(ip).await;

        // Cache misses too, so a dead endpoint is hit once per address.
        self.cache.insert(ip.to_string(), result.clone());

        result
    }

    async fn fetch(&self, ip: &str) -> Option<String> {
        let client = self.client.as_ref()?;
        let url = format!("{}/{}/country/", self.base_url, ip);

        let resp = client
            .get(&url)
            .send()
            .await
            .map_err(|e| tracing::debug!("geo lookup failed for {ip}: {e}"))
            .ok()?;

        if !resp.status().is_success() {
            tracing::debug!("geo lookup returned {} for {ip}", resp.status());
            return None;
        }

        let body = resp
            .text()
            .await
            .map_err(|e| tracing::debug!("geo lookup body error for {ip}: {e}"))
            .ok()?;

        let country = body.trim();
        if country.is_empty() || country.len() > 56 {
            return None;
        }

        Some(country.to_string())
    }
}

/// Addresses that should never be sent to a public geolocation API:
/// loopback, link-local, private ranges, and unparseable strings.
fn is_private(ip_str: &str) -> bool {
    // Strip IPv6-mapped IPv4 prefix: "::ffff:1.2.3.4" -> "1.2.3.4"
    let ip_str = ip_str.strip_prefix("::ffff:").unwrap_or(ip_str);

    match IpAddr::from_str(ip_str) {
        Ok(IpAddr::V4(addr)) => {
            let octets = addr.octets();
            addr.is_loopback()
                || addr.is_link_local()
                || addr.is_unspecified()
                || addr.is_broadcast()
                || octets[0] == 10
                || (octets[0] == 172 && (16..=31).contains(&octets[1]))
                || (octets[0] == 192 && octets[1] == 168)
        }
        Ok(IpAddr::V6(addr)) => {
            addr.is_loopback()
                || addr.is_unspecified()
                // fe80::/10 link-local
                || (addr.segments()[0] & 0xffc0) == 0xfe80
                // fc00::/7 unique-local
                || (addr.segments()[0] & 0xfe00) == 0xfc00
        }
        Err(_) => true,
    }
}
