/// Opening -> Open -> Closed. A session never leaves Closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Constructed, initial contents not yet sent or received
    Opening,
    Open,
    Closed,
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        *self == SessionState::Open
    }

    pub fn is_closed(&self) -> bool {
        *self == SessionState::Closed
    }
}
