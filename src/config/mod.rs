use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api_server: ServerConfig,
    pub redirect_server: ServerConfig,
    /// Public base URL used when building short URLs, no trailing slash.
    pub base_url: String,
    pub rate_limit: RateLimitConfig,
    pub geo: GeoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length shared by all endpoint limiters.
    pub window_secs: u64,
    /// Quota for POST /api/shorten.
    pub shorten_quota: u64,
    /// Quota for the analytics read endpoints.
    pub analytics_quota: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Base URL of the IP-to-country endpoint.
    pub lookup_url: String,
    pub timeout_ms: u64,
}

impl GeoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            _ => DatabaseBackend::Sqlite,
        };

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./hoplink.db".to_string());

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = std::env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let redirect_host =
            std::env::var("REDIRECT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let redirect_port = std::env::var("REDIRECT_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()?;

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{redirect_port}"))
            .trim_end_matches('/')
            .to_string();

        let window_secs = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);
        let shorten_quota = std::env::var("SHORTEN_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);
        let analytics_quota = std::env::var("ANALYTICS_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        let geo_lookup_url = std::env::var("GEO_LOOKUP_URL")
            .unwrap_or_else(|_| "https://ipapi.co".to_string())
            .trim_end_matches('/')
            .to_string();
        let geo_timeout_ms = std::env::var("GEO_LOOKUP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(2000);

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            redirect_server: ServerConfig {
                host: redirect_host,
                port: redirect_port,
            },
            base_url,
            rate_limit: RateLimitConfig {
                window_secs,
                shorten_quota,
                analytics_quota,
            },
            geo: GeoConfig {
                lookup_url: geo_lookup_url,
                timeout_ms: geo_timeout_ms,
            },
        })
    }
}
