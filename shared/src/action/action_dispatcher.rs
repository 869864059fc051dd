use std::ops::Range;

use crate::{
    ContainerError, ItemCatalog, ItemStack, SessionLayout, StateContainer,
};

use super::{ActionOutcome, ClickButton, SlotAction, SlotTarget, ThrowAmount};

/// Interprets slot actions against a StateContainer.
///
/// The dispatcher holds no state of its own. Given equal containers and an
/// equal action, host and client produce equal containers and equal
/// outcomes, which is what lets the client apply actions optimistically.
pub struct ActionDispatcher<'a> {
    catalog: &'a ItemCatalog,
    layout: &'a SessionLayout,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(catalog: &'a ItemCatalog, layout: &'a SessionLayout) -> Self {
        Self { catalog, layout }
    }

    /// Applies `action` in place
    pub fn dispatch(
        &self,
        container: &mut StateContainer,
        action: &SlotAction,
    ) -> Result<ActionOutcome, ContainerError> {
        match *action {
            SlotAction::Pickup {
                target: SlotTarget::Slot(index),
                button,
            } => self.pickup(container, index, button),
            SlotAction::Pickup {
                target: SlotTarget::Outside,
                button,
            } => {
                let amount = match button {
                    ClickButton::Primary => ThrowAmount::Stack,
                    ClickButton::Secondary => ThrowAmount::One,
                };
                Ok(drop_cursor(container, amount))
            }
            SlotAction::QuickMove { slot } => {
                let destinations = self.layout.quick_move_destinations(slot);
                self.quick_move_into(container, slot, destinations)
            }
            SlotAction::Throw {
                target: SlotTarget::Slot(index),
                amount,
            } => throw_from_slot(container, index, amount),
            SlotAction::Throw {
                target: SlotTarget::Outside,
                amount,
            } => Ok(drop_cursor(container, amount)),
            SlotAction::Swap { slot, other } => self.swap(container, slot, other),
            SlotAction::PickupAll { slot } => self.pickup_all(container, slot),
        }
    }

    /// Applies `action` to a copy and returns the resulting container
    pub fn apply(
        &self,
        container: &StateContainer,
        action: &SlotAction,
    ) -> Result<(StateContainer, ActionOutcome), ContainerError> {
        let mut next = container.clone();
        let outcome = self.dispatch(&mut next, action)?;
        Ok((next, outcome))
    }

    /// Drains `source_index` into `ranges`, tried in order. Within a range,
    /// stacks that can absorb more are filled first, then empty slots.
    /// Reports a no-op when nothing could move, so callers never retry
    /// without progress.
    pub fn quick_move_into(
        &self,
        container: &mut StateContainer,
        source_index: usize,
        ranges: &[Range<usize>],
    ) -> Result<ActionOutcome, ContainerError> {
        let source = container.slot_at(source_index)?;
        if !source.can_take() {
            return Ok(ActionOutcome::noop());
        }
        let original = source.stack().clone();
        let mut remaining = original.clone();
        let mut outcome = ActionOutcome::noop();
        let len = container.len();

        for range in ranges {
            let range = range.start.min(len)..range.end.min(len);

            for index in range.clone() {
                if remaining.is_empty() {
                    break;
                }
                if index == source_index {
                    continue;
                }
                let dest = container.slot_at(index)?;
                if !dest.stack().can_stack_with(&remaining) {
                    continue;
                }
                let room = dest
                    .capacity_for(&remaining, self.catalog)
                    .saturating_sub(dest.stack().count());
                let amount = room.min(remaining.count());
                if amount == 0 || !dest.can_insert(&remaining.copy_with_count(amount)) {
                    continue;
                }
                let mut merged = dest.stack().clone();
                merged.grow(amount);
                remaining.shrink(amount);
                write_slot(container, index, merged, &mut outcome)?;
            }

            for index in range {
                if remaining.is_empty() {
                    break;
                }
                if index == source_index {
                    continue;
                }
                let dest = container.slot_at(index)?;
                if !dest.stack().is_empty() {
                    continue;
                }
                let amount = dest
                    .capacity_for(&remaining, self.catalog)
                    .min(remaining.count());
                if amount == 0 || !dest.can_insert(&remaining.copy_with_count(amount)) {
                    continue;
                }
                let placed = remaining.split(amount);
                write_slot(container, index, placed, &mut outcome)?;
            }

            if remaining.is_empty() {
                break;
            }
        }

        let moved_count = original.count() - remaining.count();
        if moved_count == 0 {
            return Ok(ActionOutcome::noop());
        }
        outcome.set_moved(original.copy_with_count(moved_count));
        write_slot(container, source_index, remaining, &mut outcome)?;
        Ok(outcome)
    }

    fn pickup(
        &self,
        container: &mut StateContainer,
        index: usize,
        button: ClickButton,
    ) -> Result<ActionOutcome, ContainerError> {
        let slot = container.slot_at(index)?.clone();
        let mut slot_stack = slot.stack().clone();
        let mut cursor = container.cursor().clone();
        let mut outcome = ActionOutcome::noop();

        // take from the slot
        if cursor.is_empty() {
            if !slot.can_take() {
                return Ok(outcome);
            }
            let amount = match button {
                ClickButton::Primary => slot_stack.count(),
                ClickButton::Secondary => slot_stack.count().div_ceil(2),
            };
            let taken = slot_stack.split(amount);
            outcome.set_moved(taken.clone());
            write_slot(container, index, slot_stack, &mut outcome)?;
            write_cursor(container, taken, &mut outcome);
            return Ok(outcome);
        }

        // place into an empty slot
        if slot_stack.is_empty() {
            let capacity = slot.capacity_for(&cursor, self.catalog);
            let amount = button_amount(button, cursor.count()).min(capacity);
            if amount == 0 || !slot.can_insert(&cursor.copy_with_count(amount)) {
                return Ok(outcome);
            }
            let placed = cursor.split(amount);
            outcome.set_moved(placed.clone());
            write_slot(container, index, placed, &mut outcome)?;
            write_cursor(container, cursor, &mut outcome);
            return Ok(outcome);
        }

        if slot_stack.can_stack_with(&cursor) {
            let room = slot
                .capacity_for(&cursor, self.catalog)
                .saturating_sub(slot_stack.count());
            let amount = button_amount(button, cursor.count()).min(room);
            if slot.can_insert(&cursor.copy_with_count(amount.max(1))) {
                if amount == 0 {
                    return Ok(outcome);
                }
                let placed = cursor.split(amount);
                slot_stack.grow(amount);
                outcome.set_moved(placed);
            } else if slot.can_take() && !slot.can_insert(&cursor.copy_with_count(1)) {
                // output-only slots fill the cursor instead
                let room = self
                    .catalog
                    .max_count(cursor.kind())
                    .saturating_sub(cursor.count());
                let amount = slot_stack.count().min(room);
                if amount == 0 {
                    return Ok(outcome);
                }
                let taken = slot_stack.split(amount);
                cursor.grow(amount);
                outcome.set_moved(taken);
            } else {
                return Ok(outcome);
            }
            write_slot(container, index, slot_stack, &mut outcome)?;
            write_cursor(container, cursor, &mut outcome);
            return Ok(outcome);
        }

        // different items trade places when both directions are allowed
        if slot.can_insert(&cursor)
            && slot.can_take()
            && cursor.count() <= slot.capacity_for(&cursor, self.catalog)
        {
            outcome.set_moved(slot_stack.clone());
            write_slot(container, index, cursor, &mut outcome)?;
            write_cursor(container, slot_stack, &mut outcome);
        }
        Ok(outcome)
    }

    fn swap(
        &self,
        container: &mut StateContainer,
        slot_index: usize,
        other_index: usize,
    ) -> Result<ActionOutcome, ContainerError> {
        let slot = container.slot_at(slot_index)?.clone();
        let other = container.slot_at(other_index)?.clone();
        let slot_stack = slot.stack().clone();
        let other_stack = other.stack().clone();

        if slot_index == other_index || slot_stack == other_stack {
            return Ok(ActionOutcome::noop());
        }
        if !slot_stack.is_empty()
            && !(slot.can_take()
                && other.can_insert(&slot_stack)
                && slot_stack.count() <= other.capacity_for(&slot_stack, self.catalog))
        {
            return Ok(ActionOutcome::noop());
        }
        if !other_stack.is_empty()
            && !(other.can_take()
                && slot.can_insert(&other_stack)
                && other_stack.count() <= slot.capacity_for(&other_stack, self.catalog))
        {
            return Ok(ActionOutcome::noop());
        }

        let mut outcome = ActionOutcome::noop();
        if slot_stack.is_empty() {
            outcome.set_moved(other_stack.clone());
        } else {
            outcome.set_moved(slot_stack.clone());
        }
        write_slot(container, slot_index, other_stack, &mut outcome)?;
        write_slot(container, other_index, slot_stack, &mut outcome)?;
        Ok(outcome)
    }

    fn pickup_all(
        &self,
        container: &mut StateContainer,
        slot_index: usize,
    ) -> Result<ActionOutcome, ContainerError> {
        container.slot_at(slot_index)?;
        let mut cursor = container.cursor().clone();
        let mut outcome = ActionOutcome::noop();
        if cursor.is_empty() {
            return Ok(outcome);
        }
        let limit = self.catalog.max_count(cursor.kind());
        let mut collected = 0;

        // partial stacks first, then full ones
        for take_full in [false, true] {
            for index in 0..container.len() {
                if cursor.count() >= limit {
                    break;
                }
                let source = container.slot_at(index)?;
                if !source.can_take() || !source.stack().can_stack_with(&cursor) {
                    continue;
                }
                let is_full = source.stack().count() >= limit;
                if is_full != take_full {
                    continue;
                }
                let mut stack = source.stack().clone();
                let amount = stack.count().min(limit - cursor.count());
                stack.shrink(amount);
                cursor.grow(amount);
                collected += amount;
                write_slot(container, index, stack, &mut outcome)?;
            }
        }

        if collected > 0 {
            outcome.set_moved(cursor.copy_with_count(collected));
            write_cursor(container, cursor, &mut outcome);
        }
        Ok(outcome)
    }
}

fn button_amount(button: ClickButton, available: u32) -> u32 {
    match button {
        ClickButton::Primary => available,
        ClickButton::Secondary => 1,
    }
}

fn drop_cursor(container: &mut StateContainer, amount: ThrowAmount) -> ActionOutcome {
    let mut cursor = container.cursor().clone();
    let mut outcome = ActionOutcome::noop();
    if cursor.is_empty() {
        return outcome;
    }
    let count = match amount {
        ThrowAmount::One => 1,
        ThrowAmount::Stack => cursor.count(),
    };
    outcome.set_thrown(cursor.split(count));
    write_cursor(container, cursor, &mut outcome);
    outcome
}

fn throw_from_slot(
    container: &mut StateContainer,
    index: usize,
    amount: ThrowAmount,
) -> Result<ActionOutcome, ContainerError> {
    let slot = container.slot_at(index)?;
    if !container.cursor().is_empty() || !slot.can_take() {
        return Ok(ActionOutcome::noop());
    }
    let mut stack = slot.stack().clone();
    let count = match amount {
        ThrowAmount::One => 1,
        ThrowAmount::Stack => stack.count(),
    };
    let mut outcome = ActionOutcome::noop();
    outcome.set_thrown(stack.split(count));
    write_slot(container, index, stack, &mut outcome)?;
    Ok(outcome)
}

fn write_slot(
    container: &mut StateContainer,
    index: usize,
    stack: ItemStack,
    outcome: &mut ActionOutcome,
) -> Result<(), ContainerError> {
    if container.stack_at(index)? != &stack {
        container.set_slot(index, stack)?;
        outcome.record_slot(index);
    }
    Ok(())
}

fn write_cursor(container: &mut StateContainer, stack: ItemStack, outcome: &mut ActionOutcome) {
    if container.cursor() != &stack {
        container.set_cursor(stack);
        outcome.record_cursor();
    }
}
