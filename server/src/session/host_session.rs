use log::{debug, warn};

use slotsync_shared::{
    ActionDispatcher, ActionOutcome, ActionRequest, ActionSequence, ContainerError, HostMessage,
    HostType, ItemCatalog, ItemStack, PropertyTracker, Revision, SessionContents, SessionId,
    SessionLayout, SessionOpen, SessionState, StateContainer,
};

use crate::{ResyncMode, ResyncPolicy, StorageKey, UserKey};

use super::{SessionContext, SessionHandler};

/// The authoritative copy of one session.
///
/// Besides the ground-truth container and properties, a host session keeps
/// what it believes the client currently holds. Diffs are computed against
/// that view, so a correct client prediction costs nothing on the wire.
pub struct HostSession {
    id: SessionId,
    user_key: UserKey,
    type_tag: String,
    state: SessionState,
    container: StateContainer,
    properties: PropertyTracker,
    revision: Revision,
    client_slots: Vec<ItemStack>,
    client_cursor: ItemStack,
    pending_acks: Vec<(ActionSequence, bool)>,
    resync_requested: bool,
    ticks_since_resync: u32,
    storage_links: Vec<(StorageKey, usize)>,
    handler: Option<Box<dyn SessionHandler>>,
}

impl HostSession {
    pub(crate) fn new(
        id: SessionId,
        user_key: UserKey,
        type_tag: &str,
        layout: &SessionLayout,
        handler: Option<Box<dyn SessionHandler>>,
    ) -> Self {
        let container = layout.build_container(HostType::Server);
        let client_slots = vec![ItemStack::empty(); container.len()];
        Self {
            id,
            user_key,
            type_tag: type_tag.to_string(),
            state: SessionState::Opening,
            container,
            properties: PropertyTracker::host(layout.property_count()),
            revision: Revision::default(),
            client_slots,
            client_cursor: ItemStack::empty(),
            pending_acks: Vec::new(),
            resync_requested: false,
            ticks_since_resync: 0,
            storage_links: Vec::new(),
            handler,
        }
    }

    // Public

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn user_key(&self) -> UserKey {
        self.user_key
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn container(&self) -> &StateContainer {
        &self.container
    }

    pub fn properties(&self) -> &PropertyTracker {
        &self.properties
    }

    /// Revision of the last state sent to the client
    pub fn revision(&self) -> Revision {
        self.revision
    }

    // Crate-public

    pub(crate) fn context<'s>(
        &'s mut self,
        catalog: &'s ItemCatalog,
        layout: &'s SessionLayout,
    ) -> SessionContext<'s> {
        SessionContext::new(
            self.id,
            self.user_key,
            &mut self.container,
            &mut self.properties,
            catalog,
            layout,
        )
    }

    pub(crate) fn run_handler<F>(&mut self, catalog: &ItemCatalog, layout: &SessionLayout, f: F)
    where
        F: FnOnce(&mut dyn SessionHandler, &mut SessionContext),
    {
        let Some(mut handler) = self.handler.take() else {
            return;
        };
        {
            let mut context = self.context(catalog, layout);
            f(handler.as_mut(), &mut context);
        }
        self.handler = Some(handler);
    }

    pub(crate) fn extra_payload(&self) -> Option<Vec<u8>> {
        self.handler.as_ref().and_then(|handler| handler.extra_payload())
    }

    /// Builds the initial payload. From here on the client is assumed to
    /// hold exactly this state.
    pub(crate) fn open_message(&mut self, extra: Option<Vec<u8>>) -> HostMessage {
        self.container.take_dirty();
        let slots = self.container.snapshot();
        self.client_slots = slots.clone();
        self.client_cursor = self.container.cursor().clone();
        self.state = SessionState::Open;
        HostMessage::OpenSession(SessionOpen {
            session_id: self.id,
            type_tag: self.type_tag.clone(),
            revision: self.revision,
            slots,
            cursor: self.client_cursor.clone(),
            properties: self.properties.snapshot_values(),
            extra,
        })
    }

    /// Applies a client action authoritatively and records the client's
    /// predictions as what it now holds
    pub(crate) fn apply_action(
        &mut self,
        catalog: &ItemCatalog,
        layout: &SessionLayout,
        request: &ActionRequest,
        policy: &ResyncPolicy,
    ) -> Result<(ActionOutcome, bool), ContainerError> {
        let before = self.container.snapshot();
        let outcome = ActionDispatcher::new(catalog, layout).dispatch(&mut self.container, &request.action)?;

        let matched = self.prediction_matches(request, &outcome);
        if self.revision.is_newer_than(&request.revision) && policy.on_stale_revision {
            debug!(
                "Session {} action {} made against stale revision {}, current is {}",
                self.id,
                request.sequence.value(),
                request.revision.value(),
                self.revision.value()
            );
            self.resync_requested = true;
        } else {
            for (index, stack) in &request.predicted_slots {
                let Some(known) = self.client_slots.get_mut(*index) else {
                    warn!("Session {} prediction names slot {} out of range", self.id, index);
                    continue;
                };
                *known = stack.clone();
                self.container.mark_dirty(*index)?;
            }
            self.client_cursor = request.predicted_cursor.clone();
            self.container.mark_cursor_dirty();
            if !matched && policy.on_prediction_mismatch == ResyncMode::Full {
                self.resync_requested = true;
            }
        }
        if !matched {
            debug!(
                "Session {} action {} mispredicted",
                self.id,
                request.sequence.value()
            );
        }
        self.pending_acks.push((request.sequence, matched));

        let mut takes = Vec::new();
        for index in outcome.changed_slots() {
            let (Some(old), Ok(new)) = (before.get(*index), self.container.stack_at(*index)) else {
                continue;
            };
            let remaining = if new.can_stack_with(old) { new.count() } else { 0 };
            if !old.is_empty() && remaining < old.count() {
                takes.push((*index, old.copy_with_count(old.count() - remaining)));
            }
        }
        for (slot, taken) in takes {
            self.run_handler(catalog, layout, |handler, context| {
                handler.on_take(context, slot, &taken)
            });
        }
        if !outcome.thrown().is_empty() {
            let thrown = outcome.thrown().clone();
            self.run_handler(catalog, layout, |handler, context| {
                handler.on_throw(context, &thrown)
            });
        }

        Ok((outcome, matched))
    }

    fn prediction_matches(&self, request: &ActionRequest, outcome: &ActionOutcome) -> bool {
        if &request.predicted_cursor != self.container.cursor() {
            return false;
        }
        for (index, predicted) in &request.predicted_slots {
            match self.container.stack_at(*index) {
                Ok(actual) if actual == predicted => {}
                _ => return false,
            }
        }
        outcome.changed_slots().iter().all(|index| {
            request
                .predicted_slots
                .iter()
                .any(|(predicted, _)| predicted == index)
        })
    }

    pub(crate) fn request_resync(&mut self) {
        self.resync_requested = true;
    }

    pub(crate) fn tick(
        &mut self,
        catalog: &ItemCatalog,
        layout: &SessionLayout,
        periodic_ticks: Option<u32>,
    ) {
        self.run_handler(catalog, layout, |handler, context| handler.tick(context));
        if let Some(period) = periodic_ticks {
            self.ticks_since_resync += 1;
            if self.ticks_since_resync >= period {
                self.resync_requested = true;
            }
        }
    }

    /// Drains everything the client has not seen yet into `outgoing`.
    /// Acks always follow the corrections for their action. Returns whether
    /// a full resync was written.
    pub(crate) fn collect_messages(&mut self, outgoing: &mut Vec<HostMessage>) -> bool {
        if self.state != SessionState::Open {
            return false;
        }

        if self.resync_requested {
            self.resync_requested = false;
            self.ticks_since_resync = 0;
            self.container.take_dirty();
            self.revision = self.revision.next();
            self.client_slots = self.container.snapshot();
            self.client_cursor = self.container.cursor().clone();
            outgoing.push(HostMessage::SessionContents(SessionContents {
                session_id: self.id,
                revision: self.revision,
                slots: self.client_slots.clone(),
                cursor: self.client_cursor.clone(),
                properties: self.properties.snapshot_values(),
            }));
            self.collect_acks(outgoing);
            return true;
        }

        let dirty = self.container.take_dirty();
        let mut updates = Vec::new();
        for index in dirty.slots {
            let (Ok(stack), Some(known)) =
                (self.container.stack_at(index), self.client_slots.get_mut(index))
            else {
                continue;
            };
            if stack != known {
                *known = stack.clone();
                updates.push((index, stack.clone()));
            }
        }
        let cursor_changed = dirty.cursor && self.container.cursor() != &self.client_cursor;

        if !updates.is_empty() || cursor_changed {
            self.revision = self.revision.next();
        }
        for (index, stack) in updates {
            outgoing.push(HostMessage::SlotUpdate {
                session_id: self.id,
                revision: self.revision,
                index,
                stack,
            });
        }
        if cursor_changed {
            self.client_cursor = self.container.cursor().clone();
            outgoing.push(HostMessage::CursorUpdate {
                session_id: self.id,
                revision: self.revision,
                stack: self.client_cursor.clone(),
            });
        }
        for (index, value) in self.properties.pending_changes() {
            outgoing.push(HostMessage::PropertyUpdate {
                session_id: self.id,
                index,
                value,
            });
        }
        self.collect_acks(outgoing);
        false
    }

    fn collect_acks(&mut self, outgoing: &mut Vec<HostMessage>) {
        for (sequence, matched) in self.pending_acks.drain(..) {
            outgoing.push(HostMessage::ActionAck {
                session_id: self.id,
                sequence,
                matched,
            });
        }
    }

    pub(crate) fn close(&mut self, catalog: &ItemCatalog, layout: &SessionLayout) {
        if self.state == SessionState::Closed {
            return;
        }
        self.run_handler(catalog, layout, |handler, context| handler.on_close(context));
        self.state = SessionState::Closed;
        self.pending_acks.clear();
    }

    pub(crate) fn storage_links(&self) -> &[(StorageKey, usize)] {
        &self.storage_links
    }

    pub(crate) fn add_storage_link(&mut self, storage_key: StorageKey, first_slot: usize) {
        self.storage_links.push((storage_key, first_slot));
    }

    pub(crate) fn remove_storage_link(&mut self, storage_key: &StorageKey) {
        self.storage_links.retain(|(key, _)| key != storage_key);
    }

    pub(crate) fn container_mut(&mut self) -> &mut StateContainer {
        &mut self.container
    }
}
