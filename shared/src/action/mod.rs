mod action_dispatcher;
mod action_outcome;
mod slot_action;

pub use action_dispatcher::ActionDispatcher;
pub use action_outcome::ActionOutcome;
pub use slot_action::{ActionKind, ClickButton, SlotAction, SlotTarget, ThrowAmount};
