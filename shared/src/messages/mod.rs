mod client_message;
mod host_message;
mod packet;

pub use client_message::{ActionRequest, ClientMessage};
pub use host_message::{HostMessage, SessionContents, SessionOpen};
pub use packet::{read_packet, write_packets, MTU_SIZE_BYTES};
