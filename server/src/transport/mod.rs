use std::net::SocketAddr;

#[derive(Debug)]
pub struct SendError;

#[derive(Debug)]
pub struct RecvError;

pub trait PacketSender: Send + Sync {
    /// Sends a packet to the Client at `address`
    fn send(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), SendError>;
}

pub trait PacketReceiver: Send + Sync {
    /// Receives the next packet from any Client, if one is waiting
    fn receive(&mut self) -> Result<Option<(SocketAddr, &[u8])>, RecvError>;
}
