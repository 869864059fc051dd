use slotsync_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger};

use crate::wire::{de_index, ser_index};

/// The closed set of slot interactions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Pickup,
    QuickMove,
    Throw,
    Swap,
    PickupAll,
}

impl ActionKind {
    fn tag(&self) -> u8 {
        match self {
            ActionKind::Pickup => 0,
            ActionKind::QuickMove => 1,
            ActionKind::Throw => 2,
            ActionKind::Swap => 3,
            ActionKind::PickupAll => 4,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, SerdeErr> {
        match tag {
            0 => Ok(ActionKind::Pickup),
            1 => Ok(ActionKind::QuickMove),
            2 => Ok(ActionKind::Throw),
            3 => Ok(ActionKind::Swap),
            4 => Ok(ActionKind::PickupAll),
            tag => Err(SerdeErr::UnknownVariant {
                type_name: "ActionKind",
                tag: tag.into(),
            }),
        }
    }
}

/// A slot, or the space outside the container where stacks are dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotTarget {
    Slot(usize),
    Outside,
}

impl Serde for SlotTarget {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            SlotTarget::Slot(index) => {
                writer.write_bit(true);
                ser_index(*index, writer);
            }
            SlotTarget::Outside => writer.write_bit(false),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(SlotTarget::Slot(de_index(reader)?))
        } else {
            Ok(SlotTarget::Outside)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClickButton {
    /// Whole-stack behaviour
    Primary,
    /// Half-stack or single-item behaviour
    Secondary,
}

impl Serde for ClickButton {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self == ClickButton::Secondary);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(ClickButton::Secondary)
        } else {
            Ok(ClickButton::Primary)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThrowAmount {
    One,
    Stack,
}

impl Serde for ThrowAmount {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self == ThrowAmount::Stack);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(ThrowAmount::Stack)
        } else {
            Ok(ThrowAmount::One)
        }
    }
}

/// One interaction request against a StateContainer.
///
/// On the wire an action is its kind tag followed by the kind's own fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotAction {
    /// Grab, place, merge, split or swap between a slot and the cursor
    Pickup {
        target: SlotTarget,
        button: ClickButton,
    },
    /// Auto-transfer a whole stack along the layout's quick-move routes
    QuickMove { slot: usize },
    /// Discard from a slot, or from the cursor when the target is outside
    Throw {
        target: SlotTarget,
        amount: ThrowAmount,
    },
    /// Exchange the stacks of two slots
    Swap { slot: usize, other: usize },
    /// Gather stacks matching the cursor into the cursor
    PickupAll { slot: usize },
}

impl SlotAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            SlotAction::Pickup { .. } => ActionKind::Pickup,
            SlotAction::QuickMove { .. } => ActionKind::QuickMove,
            SlotAction::Throw { .. } => ActionKind::Throw,
            SlotAction::Swap { .. } => ActionKind::Swap,
            SlotAction::PickupAll { .. } => ActionKind::PickupAll,
        }
    }

    pub fn pickup(slot: usize, button: ClickButton) -> Self {
        SlotAction::Pickup {
            target: SlotTarget::Slot(slot),
            button,
        }
    }

    pub fn quick_move(slot: usize) -> Self {
        SlotAction::QuickMove { slot }
    }

    pub fn throw(slot: usize, amount: ThrowAmount) -> Self {
        SlotAction::Throw {
            target: SlotTarget::Slot(slot),
            amount,
        }
    }
}

impl Serde for SlotAction {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<3>::new(self.kind().tag()).ser(writer);
        match self {
            SlotAction::Pickup { target, button } => {
                target.ser(writer);
                button.ser(writer);
            }
            SlotAction::QuickMove { slot } | SlotAction::PickupAll { slot } => {
                ser_index(*slot, writer);
            }
            SlotAction::Throw { target, amount } => {
                target.ser(writer);
                amount.ser(writer);
            }
            SlotAction::Swap { slot, other } => {
                ser_index(*slot, writer);
                ser_index(*other, writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag: UnsignedInteger<3> = Serde::de(reader)?;
        match ActionKind::from_tag(tag.try_to()?)? {
            ActionKind::Pickup => Ok(SlotAction::Pickup {
                target: SlotTarget::de(reader)?,
                button: ClickButton::de(reader)?,
            }),
            ActionKind::QuickMove => Ok(SlotAction::QuickMove {
                slot: de_index(reader)?,
            }),
            ActionKind::Throw => Ok(SlotAction::Throw {
                target: SlotTarget::de(reader)?,
                amount: ThrowAmount::de(reader)?,
            }),
            ActionKind::Swap => Ok(SlotAction::Swap {
                slot: de_index(reader)?,
                other: de_index(reader)?,
            }),
            ActionKind::PickupAll => Ok(SlotAction::PickupAll {
                slot: de_index(reader)?,
            }),
        }
    }
}
