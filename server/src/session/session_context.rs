use std::ops::Range;

use slotsync_shared::{
    ActionDispatcher, ActionOutcome, ContainerError, ItemCatalog, ItemStack, PropertyError,
    PropertyTracker, SessionId, SessionLayout, StateContainer,
};

use crate::UserKey;

/// Mutable access to one session's state, handed to handlers and to
/// `Server::mutate_session`. Every write goes through the host container or
/// the host tracker, so it is picked up by the next diff.
pub struct SessionContext<'s> {
    session_id: SessionId,
    user_key: UserKey,
    container: &'s mut StateContainer,
    properties: &'s mut PropertyTracker,
    catalog: &'s ItemCatalog,
    layout: &'s SessionLayout,
}

impl<'s> SessionContext<'s> {
    pub(crate) fn new(
        session_id: SessionId,
        user_key: UserKey,
        container: &'s mut StateContainer,
        properties: &'s mut PropertyTracker,
        catalog: &'s ItemCatalog,
        layout: &'s SessionLayout,
    ) -> Self {
        Self {
            session_id,
            user_key,
            container,
            properties,
            catalog,
            layout,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn user_key(&self) -> UserKey {
        self.user_key
    }

    pub fn catalog(&self) -> &ItemCatalog {
        self.catalog
    }

    pub fn container(&self) -> &StateContainer {
        &*self.container
    }

    pub fn container_mut(&mut self) -> &mut StateContainer {
        &mut *self.container
    }

    pub fn properties(&self) -> &PropertyTracker {
        &*self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyTracker {
        &mut *self.properties
    }

    pub fn stack_at(&self, index: usize) -> Result<&ItemStack, ContainerError> {
        self.container.stack_at(index)
    }

    pub fn set_slot(&mut self, index: usize, stack: ItemStack) -> Result<(), ContainerError> {
        self.container.set_slot(index, stack)
    }

    pub fn property(&self, index: usize) -> Result<i32, PropertyError> {
        self.properties.current_value(index)
    }

    pub fn set_property(&mut self, index: usize, value: i32) -> Result<(), PropertyError> {
        self.properties.set_value(index, value)
    }

    /// Quick-moves `slot` into caller-chosen ranges instead of the layout's
    /// routes, for handlers that pick destinations dynamically
    pub fn quick_move_into(
        &mut self,
        slot: usize,
        ranges: &[Range<usize>],
    ) -> Result<ActionOutcome, ContainerError> {
        ActionDispatcher::new(self.catalog, self.layout)
            .quick_move_into(&mut *self.container, slot, ranges)
    }
}
