//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, ValidationError};

/// Errors returned by the session handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The store has no event log for this session.
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    /// The store failed. The inner error is passed through untouched.
    #[error(transparent)]
    Repository(#[from] DomainError),

    /// Input rejected on the write path.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::Repository(err) => err.code,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::validation(err.field().to_string(), err.to_string())
    }
}
