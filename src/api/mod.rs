//! HTTP API: root, health, metrics, visitor notifications and the LINE webhook.

pub mod error;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::{create_router, serve};
