use slotsync_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Returns whether `s1` is ahead of `s2` on a wrapping u16 sequence.
/// sequence_greater_than(2, 1) is true, sequence_greater_than(0, 65535) is true.
pub fn sequence_greater_than(s1: u16, s2: u16) -> bool {
    ((s1 > s2) && (s1 - s2 <= 32768)) || ((s1 < s2) && (s2 - s1 > 32768))
}

pub fn sequence_less_than(s1: u16, s2: u16) -> bool {
    sequence_greater_than(s2, s1)
}

macro_rules! wrapping_counter {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(u16);

        impl $name {
            pub fn new(value: u16) -> Self {
                Self(value)
            }

            pub fn value(&self) -> u16 {
                self.0
            }

            pub fn next(&self) -> Self {
                Self(self.0.wrapping_add(1))
            }

            pub fn is_newer_than(&self, other: &Self) -> bool {
                sequence_greater_than(self.0, other.0)
            }

            /// Older than or equal to `other`
            pub fn is_at_or_before(&self, other: &Self) -> bool {
                !self.is_newer_than(other)
            }
        }

        impl Serde for $name {
            fn ser(&self, writer: &mut dyn BitWrite) {
                self.0.ser(writer);
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                Ok(Self(u16::de(reader)?))
            }
        }
    };
}

wrapping_counter!(
    /// Version of a host session's state, bumped every time the host sends
    /// slot changes. Clients echo the last revision they saw.
    Revision
);

wrapping_counter!(
    /// Client-assigned number of an action request, echoed back in the ack
    ActionSequence
);
