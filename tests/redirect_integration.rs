//! Redirect integration tests
//!
//! These tests verify code resolution, click capture, and the
//! not-found path through the full redirect router, with the country
//! lookup pointed at an unreachable endpoint so enrichment degrades
//! the way it would on a network fault.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hoplink::analytics::CountryLookup;
use hoplink::api::{create_api_router, AppState};
use hoplink::limiter::RateLimiter;
use hoplink::redirect::create_redirect_router;
use hoplink::storage::{SqliteStorage, Storage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::{Layer, ServiceExt};

/// Helper to create test storage
async fn create_test_storage() -> Arc<dyn Storage> {
    // A single connection keeps the in-memory database shared across queries.
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Country lookup against a port nothing listens on: every lookup
/// degrades to None without touching the network.
fn dead_country_lookup() -> Arc<CountryLookup> {
    Arc::new(CountryLookup::new(
        "http://127.0.0.1:1",
        Duration::from_millis(200),
    ))
}

/// Helper layer to inject ConnectInfo for tests
#[derive(Clone)]
struct TestConnectInfoLayer;

impl<S> Layer<S> for TestConnectInfoLayer {
    type Service = TestConnectInfoMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TestConnectInfoMiddleware { inner }
    }
}

#[derive(Clone)]
struct TestConnectInfoMiddleware<S> {
    inner: S,
}

impl<S, B> tower::Service<Request<B>> for TestConnectInfoMiddleware<S>
where
    S: tower::Service<Request<B>> + Clone,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), S::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let addr = SocketAddr::from(([127, 0, 0, 1], 12345));
        req.extensions_mut()
            .insert(axum::extract::connect_info::ConnectInfo(addr));

        self.inner.call(req)
    }
}

#[tokio::test]
async fn test_redirect_known_code() {
    let storage = create_test_storage().await;

    let link = storage
        .create_link("redirect1", "https://example.com/destination")
        .await
        .unwrap();

    let app = create_redirect_router(storage.clone(), dead_country_lookup())
        .layer(TestConnectInfoLayer);

    let request = Request::builder()
        .uri("/r/redirect1")
        .header("user-agent", "Mozilla/5.0 (Linux; Android 10) Chrome/91.0")
        .header("x-forwarded-for", "203.0.113.9")
        .header("referer", "https://news.ycombinator.com/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get("location").unwrap(),
        "https://example.com/destination"
    );

    // One click was captured with classified labels
    let clicks = storage.clicks_for_link(link.id).await.unwrap();
    assert_eq!(clicks.len(), 1);
    let click = &clicks[0];
    assert_eq!(click.ip.as_deref(), Some("203.0.113.9"));
    assert_eq!(click.device, "mobile");
    assert_eq!(click.browser, "Chrome");
    assert_eq!(click.referrer, "https://news.ycombinator.com/");
    assert_eq!(click.user_agent, "Mozilla/5.0 (Linux; Android 10) Chrome/91.0");
    assert_eq!(click.country, None, "unreachable lookup degrades to None");
}

#[tokio::test]
async fn test_redirect_without_headers() {
    let storage = create_test_storage().await;

    let link = storage
        .create_link("bareua12", "https://example.com")
        .await
        .unwrap();

    let app = create_redirect_router(storage.clone(), dead_country_lookup())
        .layer(TestConnectInfoLayer);

    let request = Request::builder()
        .uri("/r/bareua12")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let clicks = storage.clicks_for_link(link.id).await.unwrap();
    assert_eq!(clicks.len(), 1);
    let click = &clicks[0];
    // Loopback socket with no proxy headers means no usable address
    assert_eq!(click.ip, None);
    assert_eq!(click.device, "desktop");
    assert_eq!(click.browser, "unknown");
    assert_eq!(click.referrer, "");
}

#[tokio::test]
async fn test_redirect_nonexistent_code() {
    let storage = create_test_storage().await;

    let link = storage
        .create_link("existing", "https://example.com")
        .await
        .unwrap();

    let app = create_redirect_router(storage.clone(), dead_country_lookup())
        .layer(TestConnectInfoLayer);

    let request = Request::builder()
        .uri("/r/nonexistent")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Nonexistent code should return 404"
    );

    // No click event was written for the miss
    let clicks = storage.clicks_for_link(link.id).await.unwrap();
    assert!(clicks.is_empty());
}

#[tokio::test]
async fn test_country_lookup_failure_does_not_delay_redirect() {
    let storage = create_test_storage().await;

    storage
        .create_link("timed123", "https://example.com")
        .await
        .unwrap();

    let lookup = Arc::new(CountryLookup::new(
        // Non-routable address; worst case the client times out at 200ms.
        "http://10.255.255.1:81",
        Duration::from_millis(200),
    ));
    let app = create_redirect_router(storage, lookup).layer(TestConnectInfoLayer);

    let request = Request::builder()
        .uri("/r/timed123")
        .header("x-forwarded-for", "203.0.113.9")
        .body(Body::empty())
        .unwrap();

    let start = Instant::now();
    let response = app.oneshot(request).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(
        elapsed < Duration::from_millis(1500),
        "redirect must not wait past the lookup bound, took {elapsed:?}"
    );
}

#[tokio::test]
async fn test_shorten_then_redirect_round_trip() {
    let storage = create_test_storage().await;

    let api_state = Arc::new(AppState {
        storage: storage.clone(),
        base_url: "http://localhost:3000".to_string(),
        shorten_limiter: RateLimiter::new(100, Duration::from_secs(60)),
        analytics_limiter: RateLimiter::new(100, Duration::from_secs(60)),
    });
    let api = create_api_router(api_state).layer(TestConnectInfoLayer);
    let redirects =
        create_redirect_router(storage, dead_country_lookup()).layer(TestConnectInfoLayer);

    let original = "https://example.com/round/trip?q=1";
    let request = Request::builder()
        .method("POST")
        .uri("/api/shorten")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "url": original }).to_string()))
        .unwrap();

    let response = api.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let code = body["data"]["shortCode"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/r/{code}"))
        .body(Body::empty())
        .unwrap();
    let response = redirects.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get("location").unwrap(),
        original,
        "redirect must reach the original URL unchanged"
    );
}

#[tokio::test]
async fn test_concurrent_redirects_capture_every_click() {
    let storage = create_test_storage().await;

    let link = storage
        .create_link("popular1", "https://example.com")
        .await
        .unwrap();

    let app = create_redirect_router(storage.clone(), dead_country_lookup())
        .layer(TestConnectInfoLayer);

    let mut handles = vec![];
    for i in 0..20 {
        let app_clone = app.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::builder()
                .uri("/r/popular1")
                .header("x-forwarded-for", format!("203.0.113.{i}"))
                .body(Body::empty())
                .unwrap();
            app_clone.oneshot(request).await
        }));
    }

    let mut success_count = 0;
    for handle in handles {
        if let Ok(Ok(response)) = handle.await {
            if response.status() == StatusCode::TEMPORARY_REDIRECT {
                success_count += 1;
            }
        }
    }

    assert_eq!(success_count, 20, "All 20 redirects should succeed");

    let clicks = storage.clicks_for_link(link.id).await.unwrap();
    assert_eq!(clicks.len(), 20);
}
