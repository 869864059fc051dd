//! Test support for slotsync: an in-memory network that routes packets
//! between one Server and any number of Clients, a sample protocol, and
//! helpers that drive both ends in lockstep.

pub mod helpers;
pub mod local_network;
pub mod test_protocol;

pub use helpers::{client_address, exchange_packets, exchange_packets_n_times, init_logging, tick_and_exchange, TestHarness};
pub use local_network::LocalNetwork;
pub use test_protocol::{protocol, SmelterHandler};
