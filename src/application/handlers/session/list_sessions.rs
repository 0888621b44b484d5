//! ListSessionsHandler - Query handler for paging through session metadata.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::session::{SessionError, SessionMetadata};
use crate::ports::SessionRepository;

/// Page size used when the caller does not give one.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Query for one page of session metadata.
///
/// No upper bound is applied to `limit`; it reaches the repository verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSessionsQuery {
    pub limit: u32,
    pub offset: u32,
}

impl ListSessionsQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Builds a query from optional parameters, falling back to the defaults.
    pub fn from_params(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for ListSessionsQuery {
    fn default() -> Self {
        Self::from_params(None, None)
    }
}

/// One page of session metadata.
///
/// `count` is the number of items on this page, not a total across pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPage {
    pub sessions: Vec<SessionMetadata>,
    pub count: usize,
}

impl SessionPage {
    fn from_sessions(sessions: Vec<SessionMetadata>) -> Self {
        let count = sessions.len();
        Self { sessions, count }
    }
}

/// Handler for listing sessions.
pub struct ListSessionsHandler {
    repository: Arc<dyn SessionRepository>,
}

impl ListSessionsHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListSessionsQuery) -> Result<SessionPage, SessionError> {
        let sessions = self
            .repository
            .list_metadata(query.limit, query.offset)
            .await?;

        debug!(
            limit = query.limit,
            offset = query.offset,
            returned = sessions.len(),
            "Listed sessions"
        );

        Ok(SessionPage::from_sessions(sessions))
    }
}
