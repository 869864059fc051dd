#[derive(Debug)]
pub struct SendError;

#[derive(Debug)]
pub struct RecvError;

pub trait PacketSender: Send + Sync {
    /// Sends a packet to the Server
    fn send(&self, payload: &[u8]) -> Result<(), SendError>;
}

pub trait PacketReceiver: Send + Sync {
    /// Receives the next packet from the Server, if one is waiting
    fn receive(&mut self) -> Result<Option<&[u8]>, RecvError>;
}
