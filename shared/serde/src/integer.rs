use crate::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

/// An integer written with a chosen number of bits.
///
/// Fixed integers always occupy `BITS` bits (plus a sign bit when signed).
/// Variable integers are written in `BITS`-sized groups, each preceded by a
/// bit that says whether another group follows.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    value: i128,
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8>
    SerdeInteger<SIGNED, VARIABLE, BITS>
{
    /// # Panics
    ///
    /// Panics if the value cannot be represented with this encoding.
    pub fn new<T: Into<i128>>(value: T) -> Self {
        let value = value.into();
        if BITS == 0 || BITS > 127 {
            panic!("can't create an integer with {} bits", BITS);
        }
        if !SIGNED && value < 0 {
            panic!("can't encode a negative number with an Unsigned Integer!");
        }
        if !VARIABLE {
            let max_value: i128 = 2_i128.pow(BITS as u32);
            if value.abs() >= max_value {
                panic!("with {} bits, can't encode number {}", BITS, value);
            }
        }
        Self { value }
    }

    pub fn get(&self) -> i128 {
        self.value
    }

    pub fn try_to<T: TryFrom<i128>>(&self) -> Result<T, SerdeErr> {
        T::try_from(self.value).map_err(|_| SerdeErr::IntegerOutOfRange {
            value: self.value,
            target: std::any::type_name::<T>(),
        })
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn ser(&self, writer: &mut dyn BitWrite) {
        let negative = self.value < 0;
        if SIGNED {
            writer.write_bit(negative);
        }
        let mut magnitude = self.value.unsigned_abs();

        if VARIABLE {
            loop {
                let proceed = magnitude >= 2_u128.pow(BITS as u32);
                writer.write_bit(proceed);
                for _ in 0..BITS {
                    writer.write_bit(magnitude & 1 != 0);
                    magnitude >>= 1;
                }
                if !proceed {
                    return;
                }
            }
        } else {
            for _ in 0..BITS {
                writer.write_bit(magnitude & 1 != 0);
                magnitude >>= 1;
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let negative = SIGNED && reader.read_bit()?;

        let mut magnitude: u128 = 0;
        let mut total_bits: u32 = 0;

        loop {
            let proceed = if VARIABLE { reader.read_bit()? } else { false };

            for _ in 0..BITS {
                if total_bits >= 127 {
                    return Err(SerdeErr::IntegerOverflow);
                }
                if reader.read_bit()? {
                    magnitude |= 1 << total_bits;
                }
                total_bits += 1;
            }

            if !proceed {
                break;
            }
        }

        let value = magnitude as i128;
        Ok(Self {
            value: if negative { -value } else { value },
        })
    }
}

impl<const SIGNED: bool, const BITS: u8> ConstBitLength for SerdeInteger<SIGNED, false, BITS> {
    fn const_bit_length() -> u32 {
        let sign_bit = if SIGNED { 1 } else { 0 };
        sign_bit + BITS as u32
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8, T: Into<i128>> From<T>
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
