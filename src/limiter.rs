//! Per-client rate limiting with a fixed-window counter.
//!
//! State is process-local: multiple server instances each enforce the
//! quota independently, and counters are lost on restart. This is a
//! best-effort abuse guard, not a correctness guarantee.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Clients with no discernible address all share this bucket.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// In-memory fixed-window rate limiter keyed by client identifier
/// (normally an IP address string).
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    quota: u64,
    window: Duration,
    counters: DashMap<String, (u64, Instant)>,
}

impl RateLimiter {
    pub fn new(quota: u64, window: Duration) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                quota,
                window,
                counters: DashMap::new(),
            }),
        }
    }

    /// Returns `true` if the request is admitted, `false` if the client
    /// has exhausted its quota for the current window.
    ///
    /// The first request for a key, or the first request after the
    /// window has elapsed, resets the counter to 1 and starts a new
    /// window. The DashMap entry guard keeps concurrent admits for the
    /// same key from losing increments.
    pub fn admit(&self, key: &str) -> bool {
        let mut entry = self
            .inner
            .counters
            .entry(key.to_string())
            .or_insert((0, Instant::now()));
        let (count, window_start) = entry.value_mut();

        if window_start.elapsed() >= self.inner.window {
            *count = 1;
            *window_start = Instant::now();
            true
        } else if *count < self.inner.quota {
            *count += 1;
            true
        } else {
            false
        }
    }

    /// Drops counters whose window has elapsed (background cleanup).
    pub fn cleanup(&self) {
        let window = self.inner.window;
        self.inner
            .counters
            .retain(|_, (_, start)| start.elapsed() < window);
    }
}
