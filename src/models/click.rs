use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One traversal of a redirect. Written exactly once by the redirect
/// handler, read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    /// Unix timestamp (seconds).
    pub created_at: i64,
    /// None when the client address could not be determined.
    pub ip: Option<String>,
    /// Raw user-agent header, possibly empty.
    pub user_agent: String,
    /// Referrer header, possibly empty.
    pub referrer: String,
    /// Device label derived at capture time.
    pub device: String,
    /// Browser label derived at capture time.
    pub browser: String,
    /// Best-effort country enrichment.
    pub country: Option<String>,
}

/// Click fields supplied by the redirect handler; `id` and `created_at`
/// are assigned by storage at insert time.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: String,
    pub referrer: String,
    pub device: String,
    pub browser: String,
    pub country: Option<String>,
}
