use slotsync_shared::{ItemStack, SessionId, StateContainer};

// StorageKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct StorageKey(u64);

impl StorageKey {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

/// Stacks living outside any one session, e.g. a player inventory or a
/// chest. Sessions link a contiguous slot range to a storage and every
/// change is fanned out to all linked sessions.
pub(crate) struct Storage {
    stacks: Vec<ItemStack>,
    // (session, first slot of the linked range)
    links: Vec<(SessionId, usize)>,
}

impl Storage {
    pub fn new(len: usize) -> Self {
        Self {
            stacks: vec![ItemStack::empty(); len],
            links: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn links(&self) -> &[(SessionId, usize)] {
        &self.links
    }

    pub fn add_link(&mut self, session_id: SessionId, first_slot: usize) {
        self.links.push((session_id, first_slot));
    }

    pub fn remove_link(&mut self, session_id: &SessionId) {
        self.links.retain(|(id, _)| id != session_id);
    }

    /// Returns whether the stack changed
    pub fn set_stack(&mut self, index: usize, stack: ItemStack) -> bool {
        match self.stacks.get_mut(index) {
            Some(current) if *current != stack => {
                *current = stack;
                true
            }
            _ => false,
        }
    }

    /// Copies the linked range of `container` into the storage and returns
    /// the offsets that changed
    pub fn pull_from(&mut self, container: &StateContainer, first_slot: usize) -> Vec<usize> {
        let mut changed = Vec::new();
        for (offset, stored) in self.stacks.iter_mut().enumerate() {
            let Ok(current) = container.stack_at(first_slot + offset) else {
                break;
            };
            if current != stored {
                *stored = current.clone();
                changed.push(offset);
            }
        }
        changed
    }

    /// Writes the stacks at `offsets` into the linked range of `container`
    pub fn push_into(&self, container: &mut StateContainer, first_slot: usize, offsets: &[usize]) {
        for offset in offsets {
            if let Some(stack) = self.stacks.get(*offset) {
                if container.set_slot(first_slot + offset, stack.clone()).is_err() {
                    break;
                }
            }
        }
    }
}
