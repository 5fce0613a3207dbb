use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A shortened link. Never mutated or deleted once created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    /// Unix timestamp (seconds).
    pub created_at: i64,
}
