use crate::models::{Click, Link, NewClick};
use crate::storage::trait_def::unix_now;
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id BIGSERIAL PRIMARY KEY,
                short_code TEXT NOT NULL UNIQUE,
                original_url TEXT NOT NULL,
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_original_url ON links(original_url)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clicks (
                id BIGSERIAL PRIMARY KEY,
                link_id BIGINT NOT NULL REFERENCES links(id),
                created_at BIGINT NOT NULL,
                ip TEXT,
                user_agent TEXT NOT NULL DEFAULT '',
                referrer TEXT NOT NULL DEFAULT '',
                device TEXT NOT NULL DEFAULT '',
                browser TEXT NOT NULL DEFAULT '',
                country TEXT
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_clicks_link_id ON clicks(link_id)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_clicks_created_at ON clicks(created_at)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn create_link(&self, short_code: &str, original_url: &str) -> StorageResult<Link> {
        let created_at = unix_now().map_err(StorageError::Other)?;

        let result = sqlx::query(
            r#"
            INSERT INTO links (short_code, original_url, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (short_code) DO NOTHING
            "#,
        )
        .bind(short_code)
        .bind(original_url)
        .bind(created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }

        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original_url, created_at
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        Ok(link)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original_url, created_at
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original_url, created_at
            FROM links
            WHERE original_url = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original_url, created_at
            FROM links
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn record_click(&self, click: &NewClick) -> Result<()> {
        let created_at = unix_now()?;

        sqlx::query(
            r#"
            INSERT INTO clicks (link_id, created_at, ip, user_agent, referrer, device, browser, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(click.link_id)
        .bind(created_at)
        .bind(click.ip.as_deref())
        .bind(&click.user_agent)
        .bind(&click.referrer)
        .bind(&click.device)
        .bind(&click.browser)
        .bind(click.country.as_deref())
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>> {
        let clicks = sqlx::query_as::<_, Click>(
            r#"
            SELECT id, link_id, created_at, ip, user_agent, referrer, device, browser, country
            FROM clicks
            WHERE link_id = $1
            ORDER BY id
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }

    async fn clicks_since(&self, cutoff: i64) -> Result<Vec<Click>> {
        let clicks = sqlx::query_as::<_, Click>(
            r#"
            SELECT id, link_id, created_at, ip, user_agent, referrer, device, browser, country
            FROM clicks
            WHERE created_at >= $1
            ORDER BY id
            "#,
        )
        .bind(cutoff)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }
}
