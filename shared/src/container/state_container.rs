use std::collections::BTreeSet;

use log::debug;

use crate::{HostType, ItemStack};

use super::{ContainerError, Slot, SlotRules};

/// Indices mutated since the last outbound diff was collected
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirtySlots {
    pub slots: Vec<usize>,
    pub cursor: bool,
}

impl DirtySlots {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && !self.cursor
    }
}

/// Ordered, fixed-size collection of slots plus the stack held on the cursor.
///
/// The host's container is the ground truth. Every successful mutation on a
/// host container marks the touched index dirty so the next outbound diff
/// can find it. Client containers never track dirtiness.
#[derive(Clone, Debug)]
pub struct StateContainer {
    host_type: HostType,
    slots: Vec<Slot>,
    cursor: ItemStack,
    dirty_slots: BTreeSet<usize>,
    cursor_dirty: bool,
}

impl StateContainer {
    pub fn new(host_type: HostType, rules: Vec<SlotRules>) -> Self {
        let slots = rules
            .into_iter()
            .enumerate()
            .map(|(index, rules)| Slot::new(index, rules))
            .collect();
        Self {
            host_type,
            slots,
            cursor: ItemStack::empty(),
            dirty_slots: BTreeSet::new(),
            cursor_dirty: false,
        }
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn slot_at(&self, index: usize) -> Result<&Slot, ContainerError> {
        self.slots.get(index).ok_or(ContainerError::IndexOutOfRange {
            index,
            len: self.slots.len(),
        })
    }

    pub fn stack_at(&self, index: usize) -> Result<&ItemStack, ContainerError> {
        self.slot_at(index).map(Slot::stack)
    }

    pub fn set_slot(&mut self, index: usize, stack: ItemStack) -> Result<(), ContainerError> {
        let len = self.slots.len();
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(ContainerError::IndexOutOfRange { index, len });
        };
        slot.replace(stack);
        if self.host_type == HostType::Server {
            self.dirty_slots.insert(index);
        }
        Ok(())
    }

    pub fn cursor(&self) -> &ItemStack {
        &self.cursor
    }

    pub fn set_cursor(&mut self, stack: ItemStack) {
        self.cursor = stack;
        if self.host_type == HostType::Server {
            self.cursor_dirty = true;
        }
    }

    /// Stack values in slot order, for a full resync
    pub fn snapshot(&self) -> Vec<ItemStack> {
        self.slots.iter().map(|slot| slot.stack().clone()).collect()
    }

    /// Overwrites every slot. Either the whole snapshot applies or none of it.
    pub fn apply_snapshot(&mut self, snapshot: Vec<ItemStack>) -> Result<(), ContainerError> {
        if snapshot.len() != self.slots.len() {
            return Err(ContainerError::LengthMismatch {
                expected: self.slots.len(),
                actual: snapshot.len(),
            });
        }
        for (index, stack) in snapshot.into_iter().enumerate() {
            self.slots[index].replace(stack);
            if self.host_type == HostType::Server {
                self.dirty_slots.insert(index);
            }
        }
        debug!("Applied snapshot of {} slots", self.slots.len());
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty_slots.is_empty() || self.cursor_dirty
    }

    pub fn mark_dirty(&mut self, index: usize) -> Result<(), ContainerError> {
        if index >= self.slots.len() {
            return Err(ContainerError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        if self.host_type == HostType::Server {
            self.dirty_slots.insert(index);
        }
        Ok(())
    }

    pub fn mark_cursor_dirty(&mut self) {
        if self.host_type == HostType::Server {
            self.cursor_dirty = true;
        }
    }

    /// Returns, and clears, the indices mutated since the last call
    pub fn take_dirty(&mut self) -> DirtySlots {
        let slots = std::mem::take(&mut self.dirty_slots).into_iter().collect();
        let cursor = std::mem::replace(&mut self.cursor_dirty, false);
        DirtySlots { slots, cursor }
    }
}

/// Containers compare by content only
impl PartialEq for StateContainer {
    fn eq(&self, other: &Self) -> bool {
        self.cursor == other.cursor
            && self.slots.len() == other.slots.len()
            && self
                .slots
                .iter()
                .zip(other.slots.iter())
                .all(|(a, b)| a.stack() == b.stack())
    }
}
