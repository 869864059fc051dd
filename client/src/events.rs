use std::{mem, vec::IntoIter};

use slotsync_shared::{ActionSequence, SessionId};

use crate::SlotsyncClientError;

pub struct Events {
    session_opens: Vec<(SessionId, String)>,
    session_closes: Vec<SessionId>,
    slot_updates: Vec<(SessionId, usize)>,
    property_updates: Vec<(SessionId, usize, i32)>,
    resyncs: Vec<SessionId>,
    desyncs: Vec<(SessionId, ActionSequence)>,
    errors: Vec<SlotsyncClientError>,

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
            slot_updates: Vec::new(),
            property_updates: Vec::new(),
            resyncs: Vec::new(),
            desyncs: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: Event>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: Event>(&self) -> bool {
        V::has(self)
    }

    pub(crate) fn push_session_open(&mut self, session_id: &SessionId, type_tag: &str) {
        self.session_opens.push((*session_id, type_tag.to_string()));
        self.empty = false;
    }

    pub(crate) fn push_session_close(&mut self, session_id: &SessionId) {
        self.session_closes.push(*session_id);
        self.empty = false;
    }

    pub(crate) fn push_slot_update(&mut self, session_id: &SessionId, index: usize) {
        self.slot_updates.push((*session_id, index));
        self.empty = false;
    }

    pub(crate) fn push_property_update(&mut self, session_id: &SessionId, index: usize, value: i32) {
        self.property_updates.push((*session_id, index, value));
        self.empty = false;
    }

    pub(crate) fn push_resync(&mut self, session_id: &SessionId) {
        self.resyncs.push(*session_id);
        self.empty = false;
    }

    pub(crate) fn push_desync(&mut self, session_id: &SessionId, sequence: ActionSequence) {
        self.desyncs.push((*session_id, sequence));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: SlotsyncClientError) {
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
    type Iter = IntoIter<(SessionId, String)>;

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
    type Iter = IntoIter<SessionId>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.session_closes);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.session_closes.is_empty()
    }
}

// Slot Update Event
pub struct SlotUpdateEvent;
impl Event for SlotUpdateEvent {
    type Iter = IntoIter<(SessionId, usize)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.slot_updates);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.slot_updates.is_empty()
    }
}

// Property Update Event
pub struct PropertyUpdateEvent;
impl Event for PropertyUpdateEvent {
    type Iter = IntoIter<(SessionId, usize, i32)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.property_updates);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.property_updates.is_empty()
    }
}

// Resync Event
pub struct ResyncEvent;
impl Event for ResyncEvent {
    type Iter = IntoIter<SessionId>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.resyncs);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.resyncs.is_empty()
    }
}

// Desync Event
/// The host's result for an action differed from the local prediction.
/// Its corrections have already been applied.
pub struct DesyncEvent;
impl Event for DesyncEvent {
    type Iter = IntoIter<(SessionId, ActionSequence)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.desyncs);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.desyncs.is_empty()
    }
}

// Error Event
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<SlotsyncClientError>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}
