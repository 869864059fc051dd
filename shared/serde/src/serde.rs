use crate::{BitCounter, BitReader, BitWrite, SerdeErr};

/// A type that can be written to and read back from a bit stream
pub trait Serde: Sized + Clone + PartialEq {
    fn ser(&self, writer: &mut dyn BitWrite);

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;

    fn bit_length(&self) -> u32 {
        let mut counter = BitCounter::new();
        self.ser(&mut counter);
        counter.bits_needed()
    }
}

/// A type whose encoded size never depends on its value
pub trait ConstBitLength {
    fn const_bit_length() -> u32;
}
