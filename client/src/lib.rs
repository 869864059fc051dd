//! # Slotsync Client
//! The mirroring end of slotsync: keeps a local copy of every session the
//! server opens, applies slot actions optimistically, and reconciles with
//! the server's authoritative diffs and resyncs.

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

mod client;
mod client_config;
mod error;
mod events;
mod session;

pub use client::Client;
pub use client_config::ClientConfig;
pub use error::SlotsyncClientError;
pub use events::{
    DesyncEvent, ErrorEvent, Event, Events, PropertyUpdateEvent, ResyncEvent, SessionCloseEvent,
    SessionOpenEvent, SlotUpdateEvent,
};
pub use session::ClientSession;
