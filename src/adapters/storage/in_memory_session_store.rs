//! In-Memory Session Store Adapter
//!
//! Keeps event logs and metadata in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{select_page, SessionEvent, SessionMetadata};
use crate::ports::{SessionRepository, SessionWriter};

/// In-memory storage for recorded sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    events: Arc<RwLock<HashMap<SessionId, Vec<SessionEvent>>>>,
    metadata: Arc<RwLock<HashMap<SessionId, SessionMetadata>>>,
}

impl InMemorySessionStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.events.write().await.clear();
        self.metadata.write().await.clear();
    }

    /// Number of sessions with an event log
    pub async fn session_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn get_events(&self, id: &SessionId) -> Result<Option<Vec<SessionEvent>>, DomainError> {
        Ok(self.events.read().await.get(id).cloned())
    }

    async fn get_metadata(&self, id: &SessionId) -> Result<Option<SessionMetadata>, DomainError> {
        Ok(self.metadata.read().await.get(id).cloned())
    }

    async fn list_metadata(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SessionMetadata>, DomainError> {
        let all: Vec<SessionMetadata> = self.metadata.read().await.values().cloned().collect();
        Ok(select_page(all, limit, offset))
    }
}

#[async_trait]
impl SessionWriter for InMemorySessionStore {
    async fn append_events(
        &self,
        id: &SessionId,
        events: &[SessionEvent],
    ) -> Result<(), DomainError> {
        let mut logs = self.events.write().await;
        logs.entry(id.clone())
            .or_default()
            .extend_from_slice(events);
        Ok(())
    }

    async fn save_metadata(&self, metadata: &SessionMetadata) -> Result<(), DomainError> {
        let mut all = self.metadata.write().await;
        all.insert(metadata.session_id.clone(), metadata.clone());
        Ok(())
    }
}
