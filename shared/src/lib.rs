//! # Slotsync Shared
//! Common functionality shared between slotsync-server & slotsync-client
//! crates: the slot container, properties, the action dispatcher both
//! endpoints run, and the wire messages between them.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use slotsync_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, SignedInteger,
    SignedVariableInteger, UnsignedInteger, UnsignedVariableInteger,
};

mod action;
mod container;
mod item;
mod messages;
mod property;
mod protocol;
mod revision;
mod session;
mod types;
mod wire;

pub use action::{
    ActionDispatcher, ActionKind, ActionOutcome, ClickButton, SlotAction, SlotTarget, ThrowAmount,
};
pub use container::{
    ContainerError, DirtySlots, QuickMoveRoute, SessionLayout, Slot, SlotFilter, SlotPredicate,
    SlotRules, StateContainer,
};
pub use item::{ItemCatalog, ItemKind, ItemStack, DEFAULT_MAX_STACK};
pub use messages::{
    read_packet, write_packets, ActionRequest, ClientMessage, HostMessage, SessionContents,
    SessionOpen, MTU_SIZE_BYTES,
};
pub use property::{
    ArrayPropertyGroup, PropertyError, PropertyGroup, PropertyHandle, PropertyTracker,
    SharedPropertyGroup,
};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use revision::{sequence_greater_than, sequence_less_than, ActionSequence, Revision};
pub use session::{SessionError, SessionId, SessionKinds, SessionState};
pub use types::HostType;
