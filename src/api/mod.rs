pub mod analytics;
pub mod error;
pub mod handlers;
pub mod qr;
pub mod routes;
pub mod validate;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_api_router;
