//! Integration tests for session HTTP endpoints.
//!
//! These tests drive the axum router end to end against real stores:
//! 1. Recording a batch makes the session readable
//! 2. Unknown sessions map to 404 and skip the metadata lookup
//! 3. Listing returns a page with a page-local count

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use session_replay::adapters::http::{app_router, build_app, SessionHandlers};
use session_replay::adapters::{FileSessionStore, InMemorySessionStore};
use session_replay::config::ServerConfig;
use session_replay::domain::foundation::{DomainError, SessionId, Timestamp};
use session_replay::domain::session::{SessionEvent, SessionMetadata};
use session_replay::ports::{SessionRepository, SessionWriter};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Store wrapper counting metadata lookups.
struct CountingStore {
    inner: InMemorySessionStore,
    metadata_calls: AtomicUsize,
}

#[async_trait]
impl SessionRepository for CountingStore {
    async fn get_events(&self, id: &SessionId) -> Result<Option<Vec<SessionEvent>>, DomainError> {
        self.inner.get_events(id).await
    }

    async fn get_metadata(&self, id: &SessionId) -> Result<Option<SessionMetadata>, DomainError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_metadata(id).await
    }

    async fn list_metadata(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SessionMetadata>, DomainError> {
        self.inner.list_metadata(limit, offset).await
    }
}

#[async_trait]
impl SessionWriter for CountingStore {
    async fn append_events(
        &self,
        id: &SessionId,
        events: &[SessionEvent],
    ) -> Result<(), DomainError> {
        self.inner.append_events(id, events).await
    }

    async fn save_metadata(&self, metadata: &SessionMetadata) -> Result<(), DomainError> {
        self.inner.save_metadata(metadata).await
    }
}

/// Store whose reads always fail.
struct BrokenStore;

#[async_trait]
impl SessionRepository for BrokenStore {
    async fn get_events(&self, _id: &SessionId) -> Result<Option<Vec<SessionEvent>>, DomainError> {
        Err(DomainError::database("connection refused"))
    }

    async fn get_metadata(&self, _id: &SessionId) -> Result<Option<SessionMetadata>, DomainError> {
        Err(DomainError::database("connection refused"))
    }

    async fn list_metadata(
        &self,
        _limit: u32,
        _offset: u32,
    ) -> Result<Vec<SessionMetadata>, DomainError> {
        Err(DomainError::database("connection refused"))
    }
}

#[async_trait]
impl SessionWriter for BrokenStore {
    async fn append_events(
        &self,
        _id: &SessionId,
        _events: &[SessionEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::database("connection refused"))
    }

    async fn save_metadata(&self, _metadata: &SessionMetadata) -> Result<(), DomainError> {
        Err(DomainError::database("connection refused"))
    }
}

// =============================================================================
// Single session
// =============================================================================

#[tokio::test]
async fn recorded_session_is_returned_with_metadata() {
    let app = app_router(SessionHandlers::from_store(Arc::new(InMemorySessionStore::new())));

    let (status, body) = send(
        &app,
        post_json(
            "/api/sessions/s1/events",
            json!({"events": [{"type": "click", "t": 0}], "metadata": {"duration_ms": 10}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["events_recorded"], 1);
    assert_eq!(body["metadata_saved"], true);

    let (status, body) = send(&app, get("/api/sessions/s1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "session_id": "s1",
            "events": [{"type": "click", "t": 0}],
            "metadata": {"session_id": "s1", "duration_ms": 10}
        })
    );
}

#[tokio::test]
async fn unknown_session_is_404_and_metadata_is_not_queried() {
    let store = Arc::new(CountingStore {
        inner: InMemorySessionStore::new(),
        metadata_calls: AtomicUsize::new(0),
    });
    let app = app_router(SessionHandlers::from_store(store.clone()));

    let (status, body) = send(&app, get("/api/sessions/missing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(store.metadata_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_log_without_metadata_is_found() {
    let app = app_router(SessionHandlers::from_store(Arc::new(InMemorySessionStore::new())));

    let (status, _) = send(&app, post_json("/api/sessions/quiet/events", json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/sessions/quiet")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!([]));
    assert_eq!(body["metadata"], Value::Null);
}

#[tokio::test]
async fn store_failure_is_500() {
    let app = app_router(SessionHandlers::from_store(Arc::new(BrokenStore)));

    let (status, body) = send(&app, get("/api/sessions/s1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");

    let (status, _) = send(&app, get("/api/sessions")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn blank_session_id_is_rejected_on_record() {
    let app = app_router(SessionHandlers::from_store(Arc::new(InMemorySessionStore::new())));

    let (status, body) = send(&app, post_json("/api/sessions/%20/events", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn list_returns_requested_page_with_page_count() {
    let store = Arc::new(InMemorySessionStore::new());
    for id in ["a", "b", "c"] {
        store
            .save_metadata(&SessionMetadata::new(id.into()))
            .await
            .unwrap();
    }
    let app = app_router(SessionHandlers::from_store(store));

    let (status, body) = send(&app, get("/api/sessions?limit=2&offset=0")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"sessions": [{"session_id": "a"}, {"session_id": "b"}], "count": 2})
    );
}

#[tokio::test]
async fn list_defaults_cover_fifty_sessions() {
    let store = Arc::new(InMemorySessionStore::new());
    for i in 0..60 {
        store
            .save_metadata(&SessionMetadata::new(SessionId::new(format!("s{i:02}"))))
            .await
            .unwrap();
    }
    let app = app_router(SessionHandlers::from_store(store));

    let (status, body) = send(&app, get("/api/sessions")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 50);
    assert_eq!(body["sessions"][0]["session_id"], "s00");
}

#[tokio::test]
async fn list_rejects_negative_offset() {
    let app = app_router(SessionHandlers::from_store(Arc::new(InMemorySessionStore::new())));

    let (status, _) = send(&app, get("/api/sessions?offset=-1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// File store and full middleware stack
// =============================================================================

#[tokio::test]
async fn file_store_serves_recorded_sessions_through_full_app() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path()));
    let app = build_app(SessionHandlers::from_store(store), &ServerConfig::default()).unwrap();

    let (status, _) = send(
        &app,
        post_json(
            "/api/sessions/checkout-42/events",
            json!({
                "events": [{"type": "snapshot", "t": 0}, {"type": "input", "t": 40}],
                "metadata": {"started_at": "2024-05-01T12:00:00Z", "url": "/checkout"}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/sessions/checkout-42")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["metadata"]["url"], "/checkout");

    let started = Timestamp::from_unix_millis(1_714_564_800_000).unwrap();
    assert_eq!(
        body["metadata"]["started_at"],
        started.as_datetime().to_rfc3339()
    );

    let (status, body) = send(&app, get("/api/sessions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn colliding_metadata_keys_do_not_break_file_listing() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path()));
    let app = app_router(SessionHandlers::from_store(store));

    let (status, _) = send(
        &app,
        post_json("/api/sessions/good/events", json!({"metadata": {"duration_ms": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        post_json(
            "/api/sessions/evil/events",
            json!({"metadata": {"session_id": "spoof", "url": "/cart"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/sessions/evil")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["metadata"],
        json!({"session_id": "evil", "url": "/cart"})
    );

    let (status, body) = send(&app, get("/api/sessions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn livez_responds_ok() {
    let app = build_app(
        SessionHandlers::from_store(Arc::new(InMemorySessionStore::new())),
        &ServerConfig::default(),
    )
    .unwrap();

    let (status, body) = send(&app, get("/livez")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}
