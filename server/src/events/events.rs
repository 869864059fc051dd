use std::{mem, vec::IntoIter};

use slotsync_shared::{ActionOutcome, ItemStack, SessionId, SlotAction};

use crate::{SlotsyncServerError, UserKey};

pub struct Events {
    session_opens: Vec<(UserKey, SessionId)>,
    session_closes: Vec<(UserKey, SessionId)>,
    actions: Vec<(UserKey, SessionId, SlotAction, ActionOutcome)>,
    signals: Vec<(UserKey, SessionId, u32)>,
    throws: Vec<(UserKey, SessionId, ItemStack)>,
    resyncs: Vec<(UserKey, SessionId)>,
    errors: Vec<SlotsyncServerError>,

    empty: bool,
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            session_opens: Vec::new(),
            session_closes: Vec::new(),
            actions: Vec::new(),
            signals: Vec::new(),
            throws: Vec::new(),
            resyncs: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: Event>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: Event>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_session_open(&mut self, user_key: &UserKey, session_id: &SessionId) {
        self.session_opens.push((*user_key, *session_id));
        self.empty = false;
    }

    pub(crate) fn push_session_close(&mut self, user_key: &UserKey, session_id: &SessionId) {
        self.session_closes.push((*user_key, *session_id));
        self.empty = false;
    }

    pub(crate) fn push_action(
        &mut self,
        user_key: &UserKey,
        session_id: &SessionId,
        action: SlotAction,
        outcome: ActionOutcome,
    ) {
        self.actions.push((*user_key, *session_id, action, outcome));
        self.empty = false;
    }

    pub(crate) fn push_signal(&mut self, user_key: &UserKey, session_id: &SessionId, signal_id: u32) {
        self.signals.push((*user_key, *session_id, signal_id));
        self.empty = false;
    }

    pub(crate) fn push_throw(&mut self, user_key: &UserKey, session_id: &SessionId, stack: ItemStack) {
        self.throws.push((*user_key, *session_id, stack));
        self.empty = false;
    }

    pub(crate) fn push_resync(&mut self, user_key: &UserKey, session_id: &SessionId) {
        self.resyncs.push((*user_key, *session_id));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: SlotsyncServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait Event {
    type Iter;

    fn iter(events: &mut Events) -> Self::Iter;

    fn has(events: &Events) -> bool;
}

// Session Open Event
pub struct SessionOpenEvent;
impl Event for SessionOpenEvent {
    type Iter = IntoIter<(UserKey, SessionId)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.session_opens);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.session_opens.is_empty()
    }
}

// Session Close Event
pub struct SessionCloseEvent;
impl Event for SessionCloseEvent {
    type Iter = IntoIter<(UserKey, SessionId)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.session_closes);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.session_closes.is_empty()
    }
}

// Action Event
pub struct ActionEvent;
impl Event for ActionEvent {
    type Iter = IntoIter<(UserKey, SessionId, SlotAction, ActionOutcome)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.actions);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.actions.is_empty()
    }
}

// Signal Event
pub struct SignalEvent;
impl Event for SignalEvent {
    type Iter = IntoIter<(UserKey, SessionId, u32)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.signals);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.signals.is_empty()
    }
}

// Throw Event
pub struct ThrowEvent;
impl Event for ThrowEvent {
    type Iter = IntoIter<(UserKey, SessionId, ItemStack)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.throws);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.throws.is_empty()
    }
}

// Resync Event
pub struct ResyncEvent;
impl Event for ResyncEvent {
    type Iter = IntoIter<(UserKey, SessionId)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.resyncs);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.resyncs.is_empty()
    }
}

// Error Event
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<SlotsyncServerError>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
