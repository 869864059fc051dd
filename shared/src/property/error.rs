use thiserror::Error;

/// Errors that can occur during PropertyTracker operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Property index outside of the tracker's bounds
    #[error("Property index {index} is out of range for {len} properties")]
    IndexOutOfRange { index: usize, len: usize },

    /// A client mirror was asked to change a value locally. Client writes
    /// never propagate to the host, so they are refused.
    #[error("Property {index} is a read-only mirror of the host's value")]
    MirrorWrite { index: usize },

    /// The host was handed a remote value. Only the host originates values.
    #[error("Property {index} is host-owned and cannot accept remote changes")]
    HostRemoteWrite { index: usize },

    /// A group's indices would overlap properties already bound to a group
    #[error("Property {index} is already bound to a group")]
    AlreadyBound { index: usize },

    /// The group backing a property could not be locked
    #[error("Property group backing index {index} is unavailable")]
    GroupUnavailable { index: usize },
}
