use std::net::SocketAddr;

use thiserror::Error;

use slotsync_shared::{
    ContainerError, PropertyError, ProtocolError, SerdeErr, SessionError, SessionId,
};

use crate::{StorageKey, UserKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotsyncServerError {
    #[error("Failed to send a packet to {address}")]
    SendError { address: SocketAddr },

    #[error("Failed to receive packets from the transport")]
    RecvError,

    /// A packet arrived from an address with no user
    #[error("Received a packet from {address}, which belongs to no user")]
    UnknownAddress { address: SocketAddr },

    #[error("Malformed packet from {address}: {error}")]
    Decode { address: SocketAddr, error: SerdeErr },

    #[error("User {user_key:?} does not exist")]
    UnknownUser { user_key: UserKey },

    #[error("Storage {storage_key:?} does not exist")]
    UnknownStorage { storage_key: StorageKey },

    /// A storage link would run past the end of the session's slots
    #[error("Cannot link {len} storage stacks at slot {first_slot} of session {session_id}, which has {slot_count} slots")]
    StorageOutOfRange {
        session_id: SessionId,
        first_slot: usize,
        len: usize,
        slot_count: usize,
    },

    #[error("Action in session {session_id} was rejected: {error}")]
    Action {
        session_id: SessionId,
        error: ContainerError,
    },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
