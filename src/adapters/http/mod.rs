//! HTTP adapters - REST API implementations.
//!
//! Routes are grouped per resource; [`build_app`] assembles them and applies
//! the cross-cutting layers (tracing, CORS, request timeout).

pub mod session;

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, ValidationError};

pub use session::{session_routes, SessionHandlers};

/// Routes without middleware.
pub fn app_router(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/livez", get(livez))
        .nest("/api/sessions", session_routes(handlers))
}

/// Full application: routes plus tracing, CORS, and timeout layers.
///
/// Cross-origin requests are refused unless `cors_origins` lists the origin.
pub fn build_app(handlers: SessionHandlers, server: &ServerConfig) -> Result<Router, ValidationError> {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(server.cors_header_values()?))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Ok(app_router(handlers)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn livez() -> &'static str {
    "ok"
}
