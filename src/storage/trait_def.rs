use crate::models::{Click, Link, NewClick};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short code already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables, indexes).
    async fn init(&self) -> Result<()>;

    /// Insert a new link. Fails with `StorageError::Conflict` when the
    /// short code is already taken; callers regenerate and retry.
    async fn create_link(&self, short_code: &str, original_url: &str) -> StorageResult<Link>;

    /// Get a link by short code.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>>;

    /// Get a link by its original URL (creation-time dedup).
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>>;

    /// All links, oldest first.
    async fn list_links(&self) -> Result<Vec<Link>>;

    /// Append one click event.
    async fn record_click(&self, click: &NewClick) -> Result<()>;

    /// All clicks for one link, oldest first.
    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>>;

    /// All clicks across every link with `created_at >= cutoff`.
    async fn clicks_since(&self, cutoff: i64) -> Result<Vec<Click>>;
}

pub(crate) fn unix_now() -> anyhow::Result<i64> {
    Ok(std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs() as i64)
}
