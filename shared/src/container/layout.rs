use std::ops::Range;

use crate::HostType;

use super::{SlotRules, StateContainer};

/// Where a QUICK_MOVE from any slot in `sources` may send its stack.
/// Destinations are tried in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuickMoveRoute {
    pub sources: Range<usize>,
    pub destinations: Vec<Range<usize>>,
}

/// The fixed shape of a session: slot order and rules, quick-move routes and
/// the number of properties. Host and client build their containers from the
/// same layout, which keeps slot indices aligned on both ends.
#[derive(Clone, Debug, Default)]
pub struct SessionLayout {
    slots: Vec<SlotRules>,
    quick_move: Vec<QuickMoveRoute>,
    property_count: usize,
}

impl SessionLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` slots sharing the same rules
    pub fn add_slots(mut self, count: usize, rules: SlotRules) -> Self {
        for _ in 0..count {
            self.slots.push(rules.clone());
        }
        self
    }

    pub fn add_slot(mut self, rules: SlotRules) -> Self {
        self.slots.push(rules);
        self
    }

    pub fn add_quick_move(mut self, sources: Range<usize>, destinations: Vec<Range<usize>>) -> Self {
        self.quick_move.push(QuickMoveRoute {
            sources,
            destinations,
        });
        self
    }

    pub fn with_properties(mut self, count: usize) -> Self {
        self.property_count = count;
        self
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn property_count(&self) -> usize {
        self.property_count
    }

    /// First matching route wins. No route means QUICK_MOVE is a no-op.
    pub fn quick_move_destinations(&self, source: usize) -> &[Range<usize>] {
        self.quick_move
            .iter()
            .find(|route| route.sources.contains(&source))
            .map(|route| route.destinations.as_slice())
            .unwrap_or(&[])
    }

    pub fn build_container(&self, host_type: HostType) -> StateContainer {
        StateContainer::new(host_type, self.slots.clone())
    }
}
