//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_session, list_sessions, record_events, SessionHandlers};

/// Creates the session router with all endpoints.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", get(list_sessions))
        .route("/:id", get(get_session))
        .route("/:id/events", post(record_events))
        .with_state(handlers)
}
