use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use hoplink::analytics::CountryLookup;
use hoplink::api::{self, AppState};
use hoplink::config::{Config, DatabaseBackend};
use hoplink::limiter::RateLimiter;
use hoplink::redirect;
use hoplink::storage::{PostgresStorage, SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteStorage::new(&config.database.url, 5).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(PostgresStorage::new(&config.database.url).await?)
        }
    };

    info!("Initializing database...");
    storage.init().await?;
    info!("Database initialized successfully");

    // Rate limits are enforced per process; instances behind a load
    // balancer each apply the quota independently.
    let window = Duration::from_secs(config.rate_limit.window_secs);
    let api_state = Arc::new(AppState {
        storage: Arc::clone(&storage),
        base_url: config.base_url.clone(),
        shorten_limiter: RateLimiter::new(config.rate_limit.shorten_quota, window),
        analytics_limiter: RateLimiter::new(config.rate_limit.analytics_quota, window),
    });

    let country_lookup = Arc::new(CountryLookup::new(
        &config.geo.lookup_url,
        config.geo.timeout(),
    ));
    info!(
        "Country lookups via {} (timeout {}ms)",
        config.geo.lookup_url, config.geo.timeout_ms
    );

    // Create routers
    let api_router = api::create_api_router(api_state);
    let redirect_router = redirect::create_redirect_router(Arc::clone(&storage), country_lookup);

    // Start API server
    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("🚀 API server listening on http://{}", api_addr);
    info!("   - API endpoints available at http://{}/api/...", api_addr);

    // Start redirect server
    let redirect_addr = format!(
        "{}:{}",
        config.redirect_server.host, config.redirect_server.port
    );
    let redirect_listener = tokio::net::TcpListener::bind(&redirect_addr).await?;
    info!("🚀 Redirect server listening on http://{}", redirect_addr);
    info!("   - Short links served at {}/r/<code>", config.base_url);

    // Run both servers concurrently
    tokio::try_join!(
        axum::serve(
            api_listener,
            api_router.into_make_service_with_connect_info::<SocketAddr>(),
        ),
        axum::serve(
            redirect_listener,
            redirect_router.into_make_service_with_connect_info::<SocketAddr>(),
        ),
    )?;

    Ok(())
}
