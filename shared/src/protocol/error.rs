use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// A session kind with this tag was already added
    #[error("Session kind '{type_tag}' is already registered. Each type tag may only be added once")]
    DuplicateTypeTag { type_tag: String },

    /// No session kind with this tag was added
    #[error("Session kind '{type_tag}' is not registered. Add it with Protocol::add_session_kind() on both endpoints")]
    UnknownTypeTag { type_tag: String },
}
