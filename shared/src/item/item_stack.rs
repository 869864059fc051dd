use slotsync_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

/// Identifies what an item is. Meaning is assigned by the application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKind(pub u16);

impl Serde for ItemKind {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value: UnsignedVariableInteger<7> = Serde::de(reader)?;
        Ok(Self(value.try_to()?))
    }
}

/// An item kind plus a count plus opaque auxiliary data, or nothing.
///
/// A stack with a count of zero is always the canonical empty stack, so two
/// empty stacks compare equal no matter how they were emptied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ItemStack {
    kind: ItemKind,
    count: u32,
    aux: Vec<u8>,
}

impl ItemStack {
    pub const fn empty() -> Self {
        Self {
            kind: ItemKind(0),
            count: 0,
            aux: Vec::new(),
        }
    }

    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self::with_aux(kind, count, Vec::new())
    }

    pub fn with_aux(kind: ItemKind, count: u32, aux: Vec<u8>) -> Self {
        if count == 0 {
            return Self::empty();
        }
        Self { kind, count, aux }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn aux(&self) -> &[u8] {
        &self.aux
    }

    /// Whether the two stacks could be merged into one, ignoring limits
    pub fn can_stack_with(&self, other: &ItemStack) -> bool {
        !self.is_empty() && !other.is_empty() && self.kind == other.kind && self.aux == other.aux
    }

    /// A stack of the same item with a different count
    pub fn copy_with_count(&self, count: u32) -> ItemStack {
        ItemStack::with_aux(self.kind, count, self.aux.clone())
    }

    pub fn set_count(&mut self, count: u32) {
        if count == 0 {
            *self = Self::empty();
        } else {
            self.count = count;
        }
    }

    pub fn grow(&mut self, amount: u32) {
        if self.is_empty() {
            return;
        }
        self.count = self.count.saturating_add(amount);
    }

    pub fn shrink(&mut self, amount: u32) {
        self.set_count(self.count.saturating_sub(amount));
    }

    /// Removes up to `amount` items from this stack and returns them
    pub fn split(&mut self, amount: u32) -> ItemStack {
        let taken = amount.min(self.count);
        let output = self.copy_with_count(taken);
        self.shrink(taken);
        output
    }
}

impl Serde for ItemStack {
    fn ser(&self, writer: &mut dyn BitWrite) {
        if self.is_empty() {
            writer.write_bit(false);
            return;
        }
        writer.write_bit(true);
        self.kind.ser(writer);
        UnsignedVariableInteger::<7>::new(self.count).ser(writer);
        self.aux.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if !reader.read_bit()? {
            return Ok(Self::empty());
        }
        let kind = ItemKind::de(reader)?;
        let count: UnsignedVariableInteger<7> = Serde::de(reader)?;
        let aux = Vec::<u8>::de(reader)?;
        Ok(Self::with_aux(kind, count.try_to()?, aux))
    }
}
