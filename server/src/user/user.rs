use std::net::SocketAddr;

use slotsync_shared::SessionId;

// UserKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct UserKey(u64);

impl UserKey {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

// User
pub(crate) struct User {
    address: SocketAddr,
    // oldest first
    sessions: Vec<SessionId>,
}

impl User {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            sessions: Vec::new(),
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn sessions(&self) -> &[SessionId] {
        &self.sessions
    }

    pub fn add_session(&mut self, session_id: SessionId) {
        self.sessions.push(session_id);
    }

    pub fn remove_session(&mut self, session_id: &SessionId) {
        self.sessions.retain(|id| id != session_id);
    }
}
