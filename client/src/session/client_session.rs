use std::collections::VecDeque;

use log::warn;

use slotsync_shared::{
    ActionDispatcher, ActionOutcome, ActionRequest, ActionSequence, ContainerError, HostType,
    ItemCatalog, ItemStack, PropertyError, PropertyTracker, Revision, SessionContents, SessionId,
    SessionLayout, SlotAction, StateContainer,
};

/// The client's mirror of one host session. Actions are applied here
/// immediately; every host message overwrites whatever was predicted.
pub struct ClientSession {
    id: SessionId,
    type_tag: String,
    container: StateContainer,
    properties: PropertyTracker,
    revision: Revision,
    next_sequence: ActionSequence,
    // sent actions the host has not acked yet, oldest first
    pending: VecDeque<ActionSequence>,
    extra: Option<Vec<u8>>,
}

impl ClientSession {
    pub(crate) fn new(
        id: SessionId,
        type_tag: &str,
        layout: &SessionLayout,
        extra: Option<Vec<u8>>,
    ) -> Self {
        Self {
            id,
            type_tag: type_tag.to_string(),
            container: layout.build_container(HostType::Client),
            properties: PropertyTracker::mirror(layout.property_count()),
            revision: Revision::default(),
            next_sequence: ActionSequence::default(),
            pending: VecDeque::new(),
            extra,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn container(&self) -> &StateContainer {
        &self.container
    }

    pub fn properties(&self) -> &PropertyTracker {
        &self.properties
    }

    pub fn stack_at(&self, index: usize) -> Result<&ItemStack, ContainerError> {
        self.container.stack_at(index)
    }

    pub fn cursor(&self) -> &ItemStack {
        self.container.cursor()
    }

    pub fn property(&self, index: usize) -> Result<i32, PropertyError> {
        self.properties.current_value(index)
    }

    /// Last revision received from the host
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Bootstrap bytes sent along with the open message
    pub fn extra_payload(&self) -> Option<&[u8]> {
        self.extra.as_deref()
    }

    /// Actions sent but not yet acknowledged
    pub fn pending_predictions(&self) -> usize {
        self.pending.len()
    }

    // Crate-public

    /// Runs the action against the local mirror and builds the request
    /// carrying the predicted result
    pub(crate) fn predict(
        &mut self,
        catalog: &ItemCatalog,
        layout: &SessionLayout,
        action: SlotAction,
    ) -> Result<(ActionOutcome, ActionRequest), ContainerError> {
        let outcome = ActionDispatcher::new(catalog, layout).dispatch(&mut self.container, &action)?;

        let mut predicted_slots = Vec::with_capacity(outcome.changed_slots().len());
        for index in outcome.changed_slots() {
            predicted_slots.push((*index, self.container.stack_at(*index)?.clone()));
        }
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.next();
        self.pending.push_back(sequence);

        let request = ActionRequest {
            session_id: self.id,
            revision: self.revision,
            sequence,
            action,
            predicted_slots,
            predicted_cursor: self.container.cursor().clone(),
        };
        Ok((outcome, request))
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Forgets every prediction up to and including `sequence`. Returns
    /// false if the sequence was not pending.
    pub(crate) fn acknowledge(&mut self, sequence: ActionSequence) -> bool {
        if !self.pending.contains(&sequence) {
            return false;
        }
        while let Some(oldest) = self.pending.pop_front() {
            if oldest == sequence {
                break;
            }
        }
        true
    }

    pub(crate) fn apply_slot_update(
        &mut self,
        revision: Revision,
        index: usize,
        stack: ItemStack,
    ) -> Result<(), ContainerError> {
        self.container.set_slot(index, stack)?;
        self.revision = revision;
        Ok(())
    }

    pub(crate) fn apply_cursor_update(&mut self, revision: Revision, stack: ItemStack) {
        self.container.set_cursor(stack);
        self.revision = revision;
    }

    pub(crate) fn apply_property_update(&mut self, index: usize, value: i32) -> Result<(), PropertyError> {
        self.properties.apply_remote_change(index, value)
    }

    /// Overwrites the whole mirror. A snapshot of the wrong length leaves
    /// the mirror untouched.
    pub(crate) fn apply_contents(
        &mut self,
        revision: Revision,
        slots: Vec<ItemStack>,
        cursor: ItemStack,
        properties: &[i32],
    ) -> Result<(), ContainerError> {
        self.container.apply_snapshot(slots)?;
        self.container.set_cursor(cursor);
        if let Err(error) = self.properties.apply_remote_values(properties) {
            warn!("Session {} could not apply property values: {}", self.id, error);
        }
        self.revision = revision;
        Ok(())
    }

    pub(crate) fn apply_resync(&mut self, contents: SessionContents) -> Result<(), ContainerError> {
        self.apply_contents(
            contents.revision,
            contents.slots,
            contents.cursor,
            &contents.properties,
        )?;
        self.pending.clear();
        Ok(())
    }
}
