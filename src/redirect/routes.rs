use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::analytics::CountryLookup;
use crate::storage::Storage;

use super::handlers::{health_check, redirect_url, RedirectState};

pub fn create_redirect_router(
    storage: Arc<dyn Storage>,
    country_lookup: Arc<CountryLookup>,
) -> Router {
    let state = Arc::new(RedirectState {
        storage,
        country_lookup,
    });

    Router::new()
        .route("/", get(health_check))
        .route("/r/{code}", get(redirect_url))
        .with_state(state)
}
