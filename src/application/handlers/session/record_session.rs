//! RecordSessionHandler - Command handler for ingesting recorder output.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::{SessionError, SessionEvent, SessionMetadata};
use crate::ports::SessionWriter;

/// Descriptive fields the recorder sends alongside a batch of events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataInput {
    pub started_at: Option<Timestamp>,
    pub duration_ms: Option<u64>,
    pub attributes: Map<String, Value>,
}

/// Command to append a batch of events (and optionally metadata) to a session.
#[derive(Debug, Clone)]
pub struct RecordSessionCommand {
    pub session_id: SessionId,
    pub events: Vec<SessionEvent>,
    pub metadata: Option<MetadataInput>,
}

/// Result of recording a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSessionResult {
    pub session_id: SessionId,
    pub events_recorded: usize,
    pub metadata_saved: bool,
}

/// Handler for recording session events.
pub struct RecordSessionHandler {
    writer: Arc<dyn SessionWriter>,
}

impl RecordSessionHandler {
    pub fn new(writer: Arc<dyn SessionWriter>) -> Self {
        Self { writer }
    }

    pub async fn handle(
        &self,
        cmd: RecordSessionCommand,
    ) -> Result<RecordSessionResult, SessionError> {
        cmd.session_id.ensure_present()?;

        // An empty batch still creates the log, so the session becomes readable
        self.writer
            .append_events(&cmd.session_id, &cmd.events)
            .await?;

        let metadata_saved = match cmd.metadata {
            Some(input) => {
                let metadata = SessionMetadata {
                    started_at: input.started_at,
                    duration_ms: input.duration_ms,
                    ..SessionMetadata::new(cmd.session_id.clone())
                }
                .with_attributes(input.attributes);
                self.writer.save_metadata(&metadata).await?;
                true
            }
            None => false,
        };

        info!(
            session_id = %cmd.session_id,
            events = cmd.events.len(),
            metadata_saved,
            "Recorded session batch"
        );

        Ok(RecordSessionResult {
            events_recorded: cmd.events.len(),
            session_id: cmd.session_id,
            metadata_saved,
        })
    }
}
