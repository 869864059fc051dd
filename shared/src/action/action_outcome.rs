use crate::ItemStack;

/// What an action did. An outcome with nothing moved and nothing changed is
/// the valid "no-op" result, not an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    moved: ItemStack,
    thrown: ItemStack,
    changed_slots: Vec<usize>,
    cursor_changed: bool,
}

impl ActionOutcome {
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.moved.is_empty()
            && self.thrown.is_empty()
            && self.changed_slots.is_empty()
            && !self.cursor_changed
    }

    /// The exact stack that changed hands
    pub fn moved(&self) -> &ItemStack {
        &self.moved
    }

    /// The part of `moved` that left the container entirely
    pub fn thrown(&self) -> &ItemStack {
        &self.thrown
    }

    /// Sorted indices whose stack changed
    pub fn changed_slots(&self) -> &[usize] {
        &self.changed_slots
    }

    pub fn cursor_changed(&self) -> bool {
        self.cursor_changed
    }

    pub(crate) fn set_moved(&mut self, stack: ItemStack) {
        self.moved = stack;
    }

    pub(crate) fn set_thrown(&mut self, stack: ItemStack) {
        self.moved = stack.clone();
        self.thrown = stack;
    }

    pub(crate) fn record_slot(&mut self, index: usize) {
        if let Err(position) = self.changed_slots.binary_search(&index) {
            self.changed_slots.insert(position, index);
        }
    }

    pub(crate) fn record_cursor(&mut self) {
        self.cursor_changed = true;
    }
}
