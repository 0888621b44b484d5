//! GetSessionHandler - Query handler for retrieving one recorded session.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::foundation::SessionId;
use crate::domain::session::{SessionError, SessionEvent, SessionMetadata};
use crate::ports::SessionRepository;

/// Query to get a session by ID.
///
/// The id is forwarded to the repository as-is, without validation.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

impl GetSessionQuery {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// A session's full event log together with its metadata, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub events: Vec<SessionEvent>,
    pub metadata: Option<SessionMetadata>,
}

/// Handler for retrieving a single session.
pub struct GetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<SessionRecord, SessionError> {
        // Metadata is only fetched once the event log is known to exist
        let events = match self.repository.get_events(&query.session_id).await? {
            Some(events) => events,
            None => {
                debug!(session_id = %query.session_id, "No event log for session");
                return Err(SessionError::not_found(query.session_id));
            }
        };

        let metadata = self.repository.get_metadata(&query.session_id).await?;

        debug!(
            session_id = %query.session_id,
            events = events.len(),
            has_metadata = metadata.is_some(),
            "Loaded session"
        );

        Ok(SessionRecord {
            session_id: query.session_id,
            events,
            metadata,
        })
    }
}
