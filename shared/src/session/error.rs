use thiserror::Error;

use super::SessionId;

/// Errors raised when a message or call names a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No session with this id exists on this endpoint
    #[error("Session {session_id} is unknown. It was never opened or has already been closed")]
    UnknownSessionId { session_id: SessionId },

    /// The session exists but is no longer open
    #[error("Session {session_id} is closed and accepts no further messages")]
    SessionClosed { session_id: SessionId },

    /// The sender does not own the session it addressed
    #[error("Session {session_id} does not belong to the sender of this message")]
    NotOwner { session_id: SessionId },
}
