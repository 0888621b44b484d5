//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    GetSessionHandler, GetSessionQuery, ListSessionsHandler, ListSessionsQuery,
    RecordSessionCommand, RecordSessionHandler,
};
use crate::domain::foundation::SessionId;
use crate::domain::session::{SessionError, SessionEvent};
use crate::ports::{SessionRepository, SessionWriter};

use super::dto::{
    ErrorResponse, ListSessionsParams, RecordEventsRequest, RecordEventsResponse,
    SessionListResponse, SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    get_handler: Arc<GetSessionHandler>,
    list_handler: Arc<ListSessionsHandler>,
    record_handler: Arc<RecordSessionHandler>,
}

impl SessionHandlers {
    pub fn new(
        get_handler: Arc<GetSessionHandler>,
        list_handler: Arc<ListSessionsHandler>,
        record_handler: Arc<RecordSessionHandler>,
    ) -> Self {
        Self {
            get_handler,
            list_handler,
            record_handler,
        }
    }

    /// Wires all handlers to a single store implementing both ports.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: SessionRepository + SessionWriter + 'static,
    {
        let repository: Arc<dyn SessionRepository> = store.clone();
        let writer: Arc<dyn SessionWriter> = store;
        Self::new(
            Arc::new(GetSessionHandler::new(repository.clone())),
            Arc::new(ListSessionsHandler::new(repository)),
            Arc::new(RecordSessionHandler::new(writer)),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/sessions/:id - Get a session's events and metadata
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let query = GetSessionQuery::new(session_id);

    match handlers.get_handler.handle(query).await {
        Ok(record) => {
            let response: SessionResponse = record.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/sessions - List one page of session metadata
pub async fn list_sessions(
    State(handlers): State<SessionHandlers>,
    Query(params): Query<ListSessionsParams>,
) -> Response {
    let query = ListSessionsQuery::from_params(params.limit, params.offset);

    match handlers.list_handler.handle(query).await {
        Ok(page) => {
            let response: SessionListResponse = page.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:id/events - Append recorder output to a session
pub async fn record_events(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<RecordEventsRequest>,
) -> Response {
    let cmd = RecordSessionCommand {
        session_id: SessionId::new(session_id),
        events: req.events.into_iter().map(SessionEvent::new).collect(),
        metadata: req.metadata.map(Into::into),
    };

    match handlers.record_handler.handle(cmd).await {
        Ok(result) => {
            let response: RecordEventsResponse = result.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_session_error(error: SessionError) -> Response {
    match error {
        SessionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Session", id.as_str())),
        )
            .into_response(),
        SessionError::ValidationFailed { field, message } => {
            tracing::debug!(%field, "Rejected session request: {}", message);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(format!(
                    "Validation failed for {}: {}",
                    field, message
                ))),
            )
                .into_response()
        }
        SessionError::Repository(err) => {
            tracing::error!(code = %err.code, details = ?err.details, "Session store failure: {}", err.message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Session storage is unavailable")),
            )
                .into_response()
        }
    }
}
