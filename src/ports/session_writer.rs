//! Session writer port (write side).
//!
//! Defines the contract for ingesting recorded events and metadata.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{SessionEvent, SessionMetadata};

/// Writer port for recorded sessions.
///
/// Implementations must ensure:
/// - Appending creates the event log if it does not exist yet, even when
///   `events` is empty
/// - Events keep their append order
#[async_trait]
pub trait SessionWriter: Send + Sync {
    /// Append events to a session's log.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` / `StorageError` on persistence failure
    /// - `SerializationError` if an event cannot be encoded
    async fn append_events(&self, id: &SessionId, events: &[SessionEvent])
        -> Result<(), DomainError>;

    /// Insert or replace the metadata for `metadata.session_id`.
    async fn save_metadata(&self, metadata: &SessionMetadata) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_writer_is_object_safe() {
        fn _accepts_dyn(_writer: &dyn SessionWriter) {}
    }
}
