//! # Slotsync Server
//! The authoritative end of slotsync: owns every session's container and
//! properties, applies the actions clients send, and streams the resulting
//! diffs back so each client mirror converges on the host's state.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod transport;
pub mod shared {
    pub use slotsync_shared::{
        BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, SignedInteger,
        SignedVariableInteger, UnsignedInteger, UnsignedVariableInteger,
    };
}

mod error;
mod events;
mod server;
mod session;
mod storage;
mod user;

pub use error::SlotsyncServerError;
pub use events::{
    ActionEvent, ErrorEvent, Event, Events, ResyncEvent, SessionCloseEvent, SessionOpenEvent,
    SignalEvent, ThrowEvent,
};
pub use server::{ResyncMode, ResyncPolicy, Server, ServerConfig};
pub use session::{HandlerFactory, HostSession, SessionContext, SessionHandler};
pub use storage::StorageKey;
pub use user::UserKey;
