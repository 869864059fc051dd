use std::net::SocketAddr;

use slotsync_client::{Client, ClientConfig};
use slotsync_server::{Server, ServerConfig, UserKey};

use crate::{protocol, test_protocol::SMELTER, LocalNetwork, SmelterHandler};

/// Installs the test logger. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn client_address(index: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 12345 + index))
}

/// One listening Server plus its connected Clients, all on one
/// LocalNetwork
pub struct TestHarness {
    pub network: LocalNetwork,
    pub server: Server,
    pub clients: Vec<(UserKey, Client)>,
}

impl TestHarness {
    pub fn new(config: ServerConfig) -> Self {
        let network = LocalNetwork::new();
        let mut server = Server::new(config, protocol());
        let (sender, receiver) = network.server_transport();
        server.listen(sender, receiver);
        let _ = server.register_handler(SMELTER, SmelterHandler::boxed);
        Self {
            network,
            server,
            clients: Vec::new(),
        }
    }

    /// Adds a user to the server and a matching connected client. Returns
    /// the client's index in `clients`.
    pub fn add_client(&mut self) -> usize {
        let index = self.clients.len();
        let address = client_address(index as u16);
        let user_key = self.server.add_user(address);
        let mut client = Client::new(ClientConfig::default(), protocol());
        let (sender, receiver) = self.network.client_transport(address);
        client.connect(sender, receiver);
        self.clients.push((user_key, client));
        index
    }

    pub fn user_key(&self, index: usize) -> UserKey {
        self.clients[index].0
    }

    pub fn client(&mut self, index: usize) -> &mut Client {
        &mut self.clients[index].1
    }

    pub fn exchange(&mut self) {
        let mut clients: Vec<&mut Client> = self.clients.iter_mut().map(|(_, client)| client).collect();
        exchange_packets(&mut self.server, &mut clients);
    }

    pub fn tick_and_exchange(&mut self) {
        let mut clients: Vec<&mut Client> = self.clients.iter_mut().map(|(_, client)| client).collect();
        tick_and_exchange(&mut self.server, &mut clients);
    }
}

/// Clients send, the server applies and replies, clients apply the replies
pub fn exchange_packets(server: &mut Server, clients: &mut [&mut Client]) {
    for client in clients.iter_mut() {
        client.send_all_packets();
    }
    server.receive_all_packets();
    server.send_all_packets();
    for client in clients.iter_mut() {
        client.receive_all_packets();
    }
}

pub fn exchange_packets_n_times(server: &mut Server, clients: &mut [&mut Client], n: usize) {
    for _ in 0..n {
        exchange_packets(server, clients);
    }
}

pub fn tick_and_exchange(server: &mut Server, clients: &mut [&mut Client]) {
    server.tick();
    exchange_packets(server, clients);
}
