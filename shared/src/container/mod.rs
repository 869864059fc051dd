mod error;
mod layout;
mod slot;
mod state_container;

pub use error::ContainerError;
pub use layout::{QuickMoveRoute, SessionLayout};
pub use slot::{Slot, SlotFilter, SlotPredicate, SlotRules};
pub use state_container::{DirtySlots, StateContainer};
