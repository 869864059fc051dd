use std::fmt;

use slotsync_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

/// Identifies one session. Assigned by the host, never reused while the
/// host is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u32);

impl SessionId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serde for SessionId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value: UnsignedVariableInteger<7> = Serde::de(reader)?;
        Ok(Self(value.try_to()?))
    }
}
