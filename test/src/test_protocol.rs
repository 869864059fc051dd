//! A furnace-like "smelter" session and a plain "chest", both sharing the
//! 36-slot player inventory layout.

use std::{
    ops::Range,
    sync::{Arc, RwLock},
};

use log::warn;

use slotsync_server::{SessionContext, SessionHandler};
use slotsync_shared::{
    ArrayPropertyGroup, ItemKind, ItemStack, Protocol, ProtocolPlugin, SessionLayout,
    SharedPropertyGroup, SlotFilter, SlotRules,
};

pub const SMELTER: &str = "smelter";
pub const CHEST: &str = "chest";

pub const ORE: ItemKind = ItemKind(1);
pub const INGOT: ItemKind = ItemKind(2);
pub const PEARL: ItemKind = ItemKind(3);

pub const PLAYER_SLOTS: Range<usize> = 0..36;
pub const INPUT_SLOT: usize = 36;
pub const OUTPUT_SLOT: usize = 37;
pub const CHEST_SLOTS: Range<usize> = 36..63;

// Properties
pub const PROGRESS: usize = 0;
pub const ENABLED: usize = 1;
pub const COLLECTED: usize = 2;

// Signals
pub const SIGNAL_DISABLE: u32 = 0;
pub const SIGNAL_ENABLE: u32 = 1;
/// Moves the input stack back into the player inventory, hotbar first
pub const SIGNAL_EJECT: u32 = 2;

/// Ticks needed to turn one ore into one ingot
pub const COOK_TIME: i32 = 3;

pub fn smelter_layout() -> SessionLayout {
    SessionLayout::new()
        .add_slots(PLAYER_SLOTS.len(), SlotRules::open())
        .add_slot(SlotRules::open().with_insert(SlotFilter::Kinds(vec![ORE])))
        .add_slot(SlotRules::output())
        .add_quick_move(INPUT_SLOT..OUTPUT_SLOT + 1, vec![PLAYER_SLOTS])
        .add_quick_move(PLAYER_SLOTS, vec![INPUT_SLOT..INPUT_SLOT + 1])
        .with_properties(3)
}

pub fn chest_layout() -> SessionLayout {
    SessionLayout::new()
        .add_slots(PLAYER_SLOTS.len(), SlotRules::open())
        .add_slots(CHEST_SLOTS.len(), SlotRules::open())
        .add_quick_move(CHEST_SLOTS, vec![PLAYER_SLOTS])
        .add_quick_move(PLAYER_SLOTS, vec![CHEST_SLOTS])
}

pub struct SlotsyncTestPlugin;

impl ProtocolPlugin for SlotsyncTestPlugin {
    fn build(&self, protocol: &mut Protocol) {
        protocol
            .add_session_kind(SMELTER, smelter_layout())
            .add_session_kind(CHEST, chest_layout())
            .max_stack(PEARL, 16);
    }
}

pub fn protocol() -> Protocol {
    Protocol::builder().add_plugin(SlotsyncTestPlugin).build()
}

/// Cooks ore into ingots, one step per tick while enabled.
pub struct SmelterHandler {
    values: Arc<RwLock<ArrayPropertyGroup>>,
}

impl Default for SmelterHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SmelterHandler {
    pub fn new() -> Self {
        Self {
            values: ArrayPropertyGroup::shared(3),
        }
    }

    pub fn boxed() -> Box<dyn SessionHandler> {
        Box::new(Self::new())
    }

    fn set(context: &mut SessionContext, index: usize, value: i32) {
        if let Err(error) = context.set_property(index, value) {
            warn!("Smelter could not set property {}: {}", index, error);
        }
    }
}

impl SessionHandler for SmelterHandler {
    fn init(&mut self, context: &mut SessionContext) {
        let group: SharedPropertyGroup = self.values.clone();
        if let Err(error) = context.properties_mut().bind_group(PROGRESS, group) {
            warn!("Smelter could not bind its properties: {}", error);
        }
        Self::set(context, ENABLED, 1);
    }

    fn extra_payload(&self) -> Option<Vec<u8>> {
        Some(COOK_TIME.to_le_bytes().to_vec())
    }

    fn on_signal(&mut self, context: &mut SessionContext, signal_id: u32) {
        match signal_id {
            SIGNAL_DISABLE => Self::set(context, ENABLED, 0),
            SIGNAL_ENABLE => Self::set(context, ENABLED, 1),
            SIGNAL_EJECT => {
                let hotbar = PLAYER_SLOTS.end - 9..PLAYER_SLOTS.end;
                if let Err(error) = context.quick_move_into(INPUT_SLOT, &[hotbar, PLAYER_SLOTS]) {
                    warn!("Smelter could not eject its input: {}", error);
                }
            }
            _ => warn!("Smelter ignores signal {}", signal_id),
        }
    }

    fn on_take(&mut self, context: &mut SessionContext, slot: usize, taken: &ItemStack) {
        if slot != OUTPUT_SLOT {
            return;
        }
        let collected = context.property(COLLECTED).unwrap_or(0);
        Self::set(context, COLLECTED, collected + taken.count() as i32);
    }

    fn tick(&mut self, context: &mut SessionContext) {
        if context.property(ENABLED).unwrap_or(0) == 0 {
            return;
        }
        let (Ok(input), Ok(output)) = (
            context.stack_at(INPUT_SLOT).cloned(),
            context.stack_at(OUTPUT_SLOT).cloned(),
        ) else {
            return;
        };
        if input.is_empty() {
            if context.property(PROGRESS).unwrap_or(0) != 0 {
                Self::set(context, PROGRESS, 0);
            }
            return;
        }
        let has_room = output.is_empty()
            || (output.kind() == INGOT && output.count() < context.catalog().max_count(INGOT));
        if !has_room {
            return;
        }

        let progress = context.property(PROGRESS).unwrap_or(0) + 1;
        if progress < COOK_TIME {
            Self::set(context, PROGRESS, progress);
            return;
        }
        Self::set(context, PROGRESS, 0);

        let mut input = input;
        input.shrink(1);
        let output = if output.is_empty() {
            ItemStack::new(INGOT, 1)
        } else {
            let mut output = output;
            output.grow(1);
            output
        };
        if context.set_slot(INPUT_SLOT, input).is_err() || context.set_slot(OUTPUT_SLOT, output).is_err() {
            warn!("Smelter layout is missing its input or output slot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_registers_both_kinds() {
        let protocol = protocol();
        assert_eq!(protocol.layout(SMELTER).unwrap().slot_count(), 38);
        assert_eq!(protocol.layout(SMELTER).unwrap().property_count(), 3);
        assert_eq!(protocol.layout(CHEST).unwrap().slot_count(), 63);
        assert_eq!(protocol.catalog().max_count(PEARL), 16);
        assert_eq!(protocol.catalog().max_count(ORE), 64);
    }
}
