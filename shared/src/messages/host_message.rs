use slotsync_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger};

use crate::{
    wire::{de_index, de_value, de_values, ser_index, ser_value, ser_values},
    ActionSequence, ItemStack, Revision, SessionId,
};

/// Initial payload of a session: its identity, its shape and its full state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOpen {
    pub session_id: SessionId,
    pub type_tag: String,
    pub revision: Revision,
    pub slots: Vec<ItemStack>,
    pub cursor: ItemStack,
    pub properties: Vec<i32>,
    /// Host-defined bootstrap bytes for this session kind
    pub extra: Option<Vec<u8>>,
}

impl Serde for SessionOpen {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.session_id.ser(writer);
        self.type_tag.ser(writer);
        self.revision.ser(writer);
        self.slots.ser(writer);
        self.cursor.ser(writer);
        ser_values(&self.properties, writer);
        self.extra.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            session_id: SessionId::de(reader)?,
            type_tag: String::de(reader)?,
            revision: Revision::de(reader)?,
            slots: Vec::<ItemStack>::de(reader)?,
            cursor: ItemStack::de(reader)?,
            properties: de_values(reader)?,
            extra: Option::<Vec<u8>>::de(reader)?,
        })
    }
}

/// Full resync payload. Applying it twice is the same as applying it once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContents {
    pub session_id: SessionId,
    pub revision: Revision,
    pub slots: Vec<ItemStack>,
    pub cursor: ItemStack,
    pub properties: Vec<i32>,
}

impl Serde for SessionContents {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.session_id.ser(writer);
        self.revision.ser(writer);
        self.slots.ser(writer);
        self.cursor.ser(writer);
        ser_values(&self.properties, writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            session_id: SessionId::de(reader)?,
            revision: Revision::de(reader)?,
            slots: Vec::<ItemStack>::de(reader)?,
            cursor: ItemStack::de(reader)?,
            properties: de_values(reader)?,
        })
    }
}

/// Everything a host may send
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostMessage {
    OpenSession(SessionOpen),
    SlotUpdate {
        session_id: SessionId,
        revision: Revision,
        index: usize,
        stack: ItemStack,
    },
    CursorUpdate {
        session_id: SessionId,
        revision: Revision,
        stack: ItemStack,
    },
    PropertyUpdate {
        session_id: SessionId,
        index: usize,
        value: i32,
    },
    SessionContents(SessionContents),
    /// Sent after any corrections for the action with this sequence.
    /// `matched` is false when the client's prediction had to be corrected.
    ActionAck {
        session_id: SessionId,
        sequence: ActionSequence,
        matched: bool,
    },
    CloseSession { session_id: SessionId },
}

impl HostMessage {
    pub fn session_id(&self) -> SessionId {
        match self {
            HostMessage::OpenSession(open) => open.session_id,
            HostMessage::SessionContents(contents) => contents.session_id,
            HostMessage::SlotUpdate { session_id, .. }
            | HostMessage::CursorUpdate { session_id, .. }
            | HostMessage::PropertyUpdate { session_id, .. }
            | HostMessage::ActionAck { session_id, .. }
            | HostMessage::CloseSession { session_id } => *session_id,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            HostMessage::OpenSession(_) => 0,
            HostMessage::SlotUpdate { .. } => 1,
            HostMessage::CursorUpdate { .. } => 2,
            HostMessage::PropertyUpdate { .. } => 3,
            HostMessage::SessionContents(_) => 4,
            HostMessage::ActionAck { .. } => 5,
            HostMessage::CloseSession { .. } => 6,
        }
    }
}

impl Serde for HostMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<3>::new(self.tag()).ser(writer);
        match self {
            HostMessage::OpenSession(open) => open.ser(writer),
            HostMessage::SlotUpdate {
                session_id,
                revision,
                index,
                stack,
            } => {
                session_id.ser(writer);
                revision.ser(writer);
                ser_index(*index, writer);
                stack.ser(writer);
            }
            HostMessage::CursorUpdate {
                session_id,
                revision,
                stack,
            } => {
                session_id.ser(writer);
                revision.ser(writer);
                stack.ser(writer);
            }
            HostMessage::PropertyUpdate {
                session_id,
                index,
                value,
            } => {
                session_id.ser(writer);
                ser_index(*index, writer);
                ser_value(*value, writer);
            }
            HostMessage::SessionContents(contents) => contents.ser(writer),
            HostMessage::ActionAck {
                session_id,
                sequence,
                matched,
            } => {
                session_id.ser(writer);
                sequence.ser(writer);
                matched.ser(writer);
            }
            HostMessage::CloseSession { session_id } => session_id.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag: UnsignedInteger<3> = Serde::de(reader)?;
        match tag.try_to::<u8>()? {
            0 => Ok(HostMessage::OpenSession(SessionOpen::de(reader)?)),
            1 => Ok(HostMessage::SlotUpdate {
                session_id: SessionId::de(reader)?,
                revision: Revision::de(reader)?,
                index: de_index(reader)?,
                stack: ItemStack::de(reader)?,
            }),
            2 => Ok(HostMessage::CursorUpdate {
                session_id: SessionId::de(reader)?,
                revision: Revision::de(reader)?,
                stack: ItemStack::de(reader)?,
            }),
            3 => Ok(HostMessage::PropertyUpdate {
                session_id: SessionId::de(reader)?,
                index: de_index(reader)?,
                value: de_value(reader)?,
            }),
            4 => Ok(HostMessage::SessionContents(SessionContents::de(reader)?)),
            5 => Ok(HostMessage::ActionAck {
                session_id: SessionId::de(reader)?,
                sequence: ActionSequence::de(reader)?,
                matched: bool::de(reader)?,
            }),
            6 => Ok(HostMessage::CloseSession {
                session_id: SessionId::de(reader)?,
            }),
            tag => Err(SerdeErr::UnknownVariant {
                type_name: "HostMessage",
                tag: tag.into(),
            }),
        }
    }
}
