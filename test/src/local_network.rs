//! In-memory transport. Routes packets between a server and its clients
//! without any network I/O, preserving send order.

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use slotsync_client::transport::{
    PacketReceiver as ClientPacketReceiver, PacketSender as ClientPacketSender,
    RecvError as ClientRecvError, SendError as ClientSendError,
};
use slotsync_server::transport::{
    PacketReceiver as ServerPacketReceiver, PacketSender as ServerPacketSender,
    RecvError as ServerRecvError, SendError as ServerSendError,
};

type ServerQueue = Arc<Mutex<VecDeque<(SocketAddr, Vec<u8>)>>>;
type ClientQueues = Arc<Mutex<HashMap<SocketAddr, VecDeque<Vec<u8>>>>>;

#[derive(Clone, Default)]
pub struct LocalNetwork {
    to_server: ServerQueue,
    to_clients: ClientQueues,
}

impl LocalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server_transport(&self) -> (Box<dyn ServerPacketSender>, Box<dyn ServerPacketReceiver>) {
        let sender = LocalServerSender {
            queues: self.to_clients.clone(),
        };
        let receiver = LocalServerReceiver {
            queue: self.to_server.clone(),
            last_payload: Vec::new(),
        };
        (Box::new(sender), Box::new(receiver))
    }

    /// Registers a client at `address` and returns its end of the network
    pub fn client_transport(
        &self,
        address: SocketAddr,
    ) -> (Box<dyn ClientPacketSender>, Box<dyn ClientPacketReceiver>) {
        if let Ok(mut queues) = self.to_clients.lock() {
            queues.entry(address).or_default();
        }
        let sender = LocalClientSender {
            queue: self.to_server.clone(),
            address,
        };
        let receiver = LocalClientReceiver {
            queues: self.to_clients.clone(),
            address,
            last_payload: Vec::new(),
        };
        (Box::new(sender), Box::new(receiver))
    }

    /// Delivers a raw packet to the server as if `from` had sent it
    pub fn inject_to_server(&self, from: SocketAddr, payload: Vec<u8>) {
        if let Ok(mut queue) = self.to_server.lock() {
            queue.push_back((from, payload));
        }
    }

    /// Packets waiting for the client at `address`
    pub fn pending_to_client(&self, address: &SocketAddr) -> usize {
        self.to_clients
            .lock()
            .map(|queues| queues.get(address).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }

    pub fn pending_to_server(&self) -> usize {
        self.to_server.lock().map(|queue| queue.len()).unwrap_or(0)
    }
}

// Server side

struct LocalServerSender {
    queues: ClientQueues,
}

impl ServerPacketSender for LocalServerSender {
    fn send(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), ServerSendError> {
        let mut queues = self.queues.lock().map_err(|_| ServerSendError)?;
        let queue = queues.get_mut(address).ok_or(ServerSendError)?;
        queue.push_back(payload.to_vec());
        Ok(())
    }
}

struct LocalServerReceiver {
    queue: ServerQueue,
    last_payload: Vec<u8>,
}

impl ServerPacketReceiver for LocalServerReceiver {
    fn receive(&mut self) -> Result<Option<(SocketAddr, &[u8])>, ServerRecvError> {
        let next = self.queue.lock().map_err(|_| ServerRecvError)?.pop_front();
        match next {
            Some((address, payload)) => {
                self.last_payload = payload;
                Ok(Some((address, &self.last_payload)))
            }
            None => Ok(None),
        }
    }
}

// Client side

struct LocalClientSender {
    queue: ServerQueue,
    address: SocketAddr,
}

impl ClientPacketSender for LocalClientSender {
    fn send(&self, payload: &[u8]) -> Result<(), ClientSendError> {
        let mut queue = self.queue.lock().map_err(|_| ClientSendError)?;
        queue.push_back((self.address, payload.to_vec()));
        Ok(())
    }
}

struct LocalClientReceiver {
    queues: ClientQueues,
    address: SocketAddr,
    last_payload: Vec<u8>,
}

impl ClientPacketReceiver for LocalClientReceiver {
    fn receive(&mut self) -> Result<Option<&[u8]>, ClientRecvError> {
        let next = self
            .queues
            .lock()
            .map_err(|_| ClientRecvError)?
            .get_mut(&self.address)
            .and_then(VecDeque::pop_front);
        match next {
            Some(payload) => {
                self.last_payload = payload;
                Ok(Some(&self.last_payload))
            }
            None => Ok(None),
        }
    }
}
