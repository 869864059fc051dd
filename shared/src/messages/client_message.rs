use slotsync_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger, UnsignedVariableInteger};

use crate::{
    wire::{de_slots, ser_slots},
    ActionSequence, ItemStack, Revision, SessionId, SlotAction,
};

/// A slot action the client has already applied to its own mirror.
///
/// `predicted_slots` and `predicted_cursor` are what the client's mirror
/// holds after the optimistic apply. The host treats them as what the
/// client currently believes, so it only has to send back corrections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRequest {
    pub session_id: SessionId,
    /// Last host revision the client had applied when it acted
    pub revision: Revision,
    pub sequence: ActionSequence,
    pub action: SlotAction,
    pub predicted_slots: Vec<(usize, ItemStack)>,
    pub predicted_cursor: ItemStack,
}

impl Serde for ActionRequest {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.session_id.ser(writer);
        self.revision.ser(writer);
        self.sequence.ser(writer);
        self.action.ser(writer);
        ser_slots(&self.predicted_slots, writer);
        self.predicted_cursor.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            session_id: SessionId::de(reader)?,
            revision: Revision::de(reader)?,
            sequence: ActionSequence::de(reader)?,
            action: SlotAction::de(reader)?,
            predicted_slots: de_slots(reader)?,
            predicted_cursor: ItemStack::de(reader)?,
        })
    }
}

/// Everything a client may send. Nothing here can write a property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    Action(ActionRequest),
    /// Session-specific command with a host-defined meaning
    Signal { session_id: SessionId, signal_id: u32 },
    CloseSession { session_id: SessionId },
    RequestResync { session_id: SessionId },
}

impl ClientMessage {
    pub fn session_id(&self) -> SessionId {
        match self {
            ClientMessage::Action(request) => request.session_id,
            ClientMessage::Signal { session_id, .. }
            | ClientMessage::CloseSession { session_id }
            | ClientMessage::RequestResync { session_id } => *session_id,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            ClientMessage::Action(_) => 0,
            ClientMessage::Signal { .. } => 1,
            ClientMessage::CloseSession { .. } => 2,
            ClientMessage::RequestResync { .. } => 3,
        }
    }
}

impl Serde for ClientMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<2>::new(self.tag()).ser(writer);
        match self {
            ClientMessage::Action(request) => request.ser(writer),
            ClientMessage::Signal {
                session_id,
                signal_id,
            } => {
                session_id.ser(writer);
                UnsignedVariableInteger::<7>::new(*signal_id).ser(writer);
            }
            ClientMessage::CloseSession { session_id }
            | ClientMessage::RequestResync { session_id } => session_id.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag: UnsignedInteger<2> = Serde::de(reader)?;
        match tag.try_to::<u8>()? {
            0 => Ok(ClientMessage::Action(ActionRequest::de(reader)?)),
            1 => {
                let session_id = SessionId::de(reader)?;
                let signal_id: UnsignedVariableInteger<7> = Serde::de(reader)?;
                Ok(ClientMessage::Signal {
                    session_id,
                    signal_id: signal_id.try_to()?,
                })
            }
            2 => Ok(ClientMessage::CloseSession {
                session_id: SessionId::de(reader)?,
            }),
            _ => Ok(ClientMessage::RequestResync {
                session_id: SessionId::de(reader)?,
            }),
        }
    }
}
