use thiserror::Error;

use slotsync_shared::{
    ContainerError, PropertyError, ProtocolError, SerdeErr, SessionError, SessionId,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotsyncClientError {
    #[error("Client is not connected to a transport")]
    NotConnected,

    #[error("Failed to send a packet to the server")]
    SendError,

    #[error("Failed to receive packets from the transport")]
    RecvError,

    #[error("Malformed packet from the server: {error}")]
    Decode { error: SerdeErr },

    /// A host message could not be applied to the local mirror. The message
    /// is discarded, the session continues.
    #[error("Update for session {session_id} was rejected: {error}")]
    Rejected {
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
