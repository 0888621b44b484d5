//! Recorded interaction events.
//!
//! The recorder captures DOM snapshots, mutations, pointer and input activity
//! as JSON payloads. The service stores and returns them verbatim and in the
//! order they were appended; nothing on the read path looks inside.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single recorded event, kept as the raw JSON the recorder produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionEvent(Value);

impl SessionEvent {
    /// Wraps a raw JSON payload.
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// Returns the raw payload.
    pub fn payload(&self) -> &Value {
        &self.0
    }

    /// Consumes the event, returning the raw payload.
    pub fn into_payload(self) -> Value {
        self.0
    }

    /// The `"type"` field when the payload is an object carrying a string type.
    pub fn event_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }
}

impl From<Value> for SessionEvent {
    fn from(payload: Value) -> Self {
        Self(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_serializes_transparently() {
        let event = SessionEvent::new(json!({"type": "click", "t": 0}));
        let text = serde_json::to_string(&event).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, json!({"type": "click", "t": 0}));
    }

    #[test]
    fn event_type_reads_string_type_field() {
        assert_eq!(
            SessionEvent::new(json!({"type": "scroll"})).event_type(),
            Some("scroll")
        );
        assert_eq!(SessionEvent::new(json!({"type": 3})).event_type(), None);
        assert_eq!(SessionEvent::new(json!([1, 2])).event_type(), None);
    }
}
