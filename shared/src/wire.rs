use slotsync_serde::{BitReader, BitWrite, Serde, SerdeErr, SignedVariableInteger, UnsignedVariableInteger};

use crate::ItemStack;

pub(crate) fn ser_index(index: usize, writer: &mut dyn BitWrite) {
    UnsignedVariableInteger::<7>::new(index as u64).ser(writer);
}

pub(crate) fn de_index(reader: &mut BitReader) -> Result<usize, SerdeErr> {
    let index: UnsignedVariableInteger<7> = Serde::de(reader)?;
    index.try_to()
}

pub(crate) fn ser_value(value: i32, writer: &mut dyn BitWrite) {
    SignedVariableInteger::<7>::new(value).ser(writer);
}

pub(crate) fn de_value(reader: &mut BitReader) -> Result<i32, SerdeErr> {
    let value: SignedVariableInteger<7> = Serde::de(reader)?;
    value.try_to()
}

pub(crate) fn ser_values(values: &[i32], writer: &mut dyn BitWrite) {
    ser_index(values.len(), writer);
    for value in values {
        ser_value(*value, writer);
    }
}

pub(crate) fn de_values(reader: &mut BitReader) -> Result<Vec<i32>, SerdeErr> {
    let len = de_index(reader)?;
    // every value takes at least one byte on the wire
    if len > reader.bits_remaining() / 8 {
        return Err(SerdeErr::UnexpectedEnd {
            bits_read: reader.bits_read(),
        });
    }
    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        values.push(de_value(reader)?);
    }
    Ok(values)
}

/// Slot deltas are written as index then stack, the same shape the host
/// uses for corrections and the client uses for predictions.
pub(crate) fn ser_slots(slots: &[(usize, ItemStack)], writer: &mut dyn BitWrite) {
    ser_index(slots.len(), writer);
    for (index, stack) in slots {
        ser_index(*index, writer);
        stack.ser(writer);
    }
}

pub(crate) fn de_slots(reader: &mut BitReader) -> Result<Vec<(usize, ItemStack)>, SerdeErr> {
    let len = de_index(reader)?;
    if len > reader.bits_remaining() / 9 {
        return Err(SerdeErr::UnexpectedEnd {
            bits_read: reader.bits_read(),
        });
    }
    let mut slots = Vec::with_capacity(len);
    for _ in 0..len {
        let index = de_index(reader)?;
        slots.push((index, ItemStack::de(reader)?));
    }
    Ok(slots)
}
