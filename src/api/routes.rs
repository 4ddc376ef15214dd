//! HTTP API route definitions.

use std::net::SocketAddr;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::utils::shutdown_signal;

use super::handlers::{health, log_visit, notify_visitor, prometheus, root, webhook, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.cors_allowed_origin.as_deref());

    Router::new()
        // Service info and health
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(prometheus))
        // Visitor notifications from the website
        .route("/notify-visitor", post(notify_visitor))
        .route("/log-visit", post(log_visit))
        // LINE platform callbacks
        .route("/webhook", post(webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `0.0.0.0:port` and serve until a shutdown signal arrives.
pub async fn serve(state: AppState, port: u16) -> crate::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    info!("Ready to receive POST requests at /notify-visitor, /log-visit and /webhook");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// CORS policy for browser callers: GET and POST with a JSON body.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(e)) => {
            warn!(error = %e, "Invalid CORS origin, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
