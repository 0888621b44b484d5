//! Summary metadata describing a recorded session.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{SessionId, Timestamp};

/// Keys owned by the typed fields; they never appear in `attributes`.
pub const RESERVED_KEYS: [&str; 3] = ["session_id", "started_at", "duration_ms"];

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Descriptive record for a session (start time, duration, recorder attributes).
///
/// Fields the service does not model explicitly (page URL, user agent,
/// viewport, ...) live in `attributes` and are flattened on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub session_id: SessionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl SessionMetadata {
    /// Creates metadata with only the session id set.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            started_at: None,
            duration_ms: None,
            attributes: Map::new(),
        }
    }

    pub fn with_started_at(mut self, started_at: Timestamp) -> Self {
        self.started_at = Some(started_at);
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Adds one attribute. Reserved keys are ignored.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !is_reserved(&key) {
            self.attributes.insert(key, value);
        }
        self
    }

    /// Merges `attributes`, dropping reserved keys so the flattened wire form
    /// never carries a second `session_id`.
    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes
            .extend(attributes.into_iter().filter(|(key, _)| !is_reserved(key)));
        self
    }

    /// Listing order shared by every store: most recently started first,
    /// sessions without a start time last, ties broken by id ascending.
    pub fn listing_order(&self, other: &Self) -> Ordering {
        let by_start = match (&self.started_at, &other.started_at) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_start.then_with(|| self.session_id.cmp(&other.session_id))
    }
}

/// Orders `all` by [`SessionMetadata::listing_order`] and cuts one page out of it.
pub fn select_page(mut all: Vec<SessionMetadata>, limit: u32, offset: u32) -> Vec<SessionMetadata> {
    all.sort_by(SessionMetadata::listing_order);
    all.into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}
