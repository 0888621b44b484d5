//! Session repository port (read side).
//!
//! Defines the contract the query handlers use to read recorded sessions.
//!
//! # Design
//!
//! - **Absent vs empty**: `get_events` distinguishes an unknown session
//!   (`None`) from a known session whose log is empty (`Some(vec![])`)
//! - **Store-defined order**: `list_metadata` pages through metadata in the
//!   order documented on [`SessionMetadata::listing_order`]

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{SessionEvent, SessionMetadata};

/// Reader port for recorded sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Get the ordered event log for a session.
    ///
    /// Returns `None` if the session is unknown.
    async fn get_events(&self, id: &SessionId) -> Result<Option<Vec<SessionEvent>>, DomainError>;

    /// Get summary metadata for a session.
    ///
    /// Returns `None` if no metadata was recorded.
    async fn get_metadata(&self, id: &SessionId) -> Result<Option<SessionMetadata>, DomainError>;

    /// List one page of session metadata.
    ///
    /// `limit` is passed through without an upper bound.
    async fn list_metadata(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SessionMetadata>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
