//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::{MetadataInput, RecordSessionResult, SessionPage, SessionRecord};
use crate::domain::foundation::Timestamp;
use crate::domain::session::SessionMetadata;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSessionsParams {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

/// A batch of recorder output for one session.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEventsRequest {
    #[serde(default)]
    pub events: Vec<Value>,
    #[serde(default)]
    pub metadata: Option<MetadataRequest>,
}

/// Metadata sent with a batch. Unknown fields are kept as attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataRequest {
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl From<MetadataRequest> for MetadataInput {
    fn from(req: MetadataRequest) -> Self {
        Self {
            started_at: req.started_at.map(Timestamp::from_datetime),
            duration_ms: req.duration_ms,
            attributes: req.attributes,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Session metadata as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct SessionMetadataResponse {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl From<SessionMetadata> for SessionMetadataResponse {
    fn from(metadata: SessionMetadata) -> Self {
        Self {
            session_id: metadata.session_id.into_inner(),
            started_at: metadata
                .started_at
                .map(|ts| ts.as_datetime().to_rfc3339()),
            duration_ms: metadata.duration_ms,
            attributes: metadata.attributes,
        }
    }
}

/// A full session: event log plus metadata (`null` when none was recorded).
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub events: Vec<Value>,
    pub metadata: Option<SessionMetadataResponse>,
}

impl From<SessionRecord> for SessionResponse {
    fn from(record: SessionRecord) -> Self {
        Self {
            session_id: record.session_id.into_inner(),
            events: record.events.into_iter().map(|e| e.into_payload()).collect(),
            metadata: record.metadata.map(Into::into),
        }
    }
}

/// One page of sessions. `count` is the size of this page.
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionMetadataResponse>,
    pub count: usize,
}

impl From<SessionPage> for SessionListResponse {
    fn from(page: SessionPage) -> Self {
        Self {
            sessions: page.sessions.into_iter().map(Into::into).collect(),
            count: page.count,
        }
    }
}

/// Acknowledgement for a recorded batch.
#[derive(Debug, Clone, Serialize)]
pub struct RecordEventsResponse {
    pub session_id: String,
    pub events_recorded: usize,
    pub metadata_saved: bool,
}

impl From<RecordSessionResult> for RecordEventsResponse {
    fn from(result: RecordSessionResult) -> Self {
        Self {
            session_id: result.session_id.into_inner(),
            events_recorded: result.events_recorded,
            metadata_saved: result.metadata_saved,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::session::SessionEvent;
    use serde_json::json;

    #[test]
    fn record_request_deserializes_events_and_metadata() {
        let json = r#"{
            "events": [{"type": "click", "t": 0}],
            "metadata": {"started_at": "2024-05-01T12:00:00Z", "duration_ms": 10, "url": "/checkout"}
        }"#;
        let req: RecordEventsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.events, vec![json!({"type": "click", "t": 0})]);

        let input: MetadataInput = req.metadata.unwrap().into();
        assert_eq!(input.duration_ms, Some(10));
        assert!(input.started_at.is_some());
        assert_eq!(input.attributes.get("url"), Some(&json!("/checkout")));
    }

    #[test]
    fn record_request_allows_empty_body_object() {
        let req: RecordEventsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.events.is_empty());
        assert!(req.metadata.is_none());
    }

    #[test]
    fn session_response_serializes_absent_metadata_as_null() {
        let record = SessionRecord {
            session_id: SessionId::new("s1"),
            events: vec![SessionEvent::new(json!({"type": "click", "t": 0}))],
            metadata: None,
        };

        let value = serde_json::to_value(SessionResponse::from(record)).unwrap();
        assert_eq!(
            value,
            json!({"session_id": "s1", "events": [{"type": "click", "t": 0}], "metadata": null})
        );
    }

    #[test]
    fn list_response_keeps_page_count() {
        let page = SessionPage {
            sessions: vec![
                SessionMetadata::new("a".into()),
                SessionMetadata::new("b".into()),
            ],
            count: 2,
        };

        let value = serde_json::to_value(SessionListResponse::from(page)).unwrap();
        assert_eq!(
            value,
            json!({"sessions": [{"session_id": "a"}, {"session_id": "b"}], "count": 2})
        );
    }

    #[test]
    fn error_response_not_found_creates_correctly() {
        let error = ErrorResponse::not_found("Session", "abc-123");
        assert_eq!(error.code, "NOT_FOUND");
        assert_eq!(error.message, "Session not found: abc-123");
    }
}
