use std::default::Default;

/// How the host repairs a client whose prediction came out wrong
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResyncMode {
    /// Send only the slots and cursor that differ
    Corrections,
    /// Send the whole session contents
    Full,
}

/// When the host sends a full resync instead of per-slot diffs
#[derive(Clone, Debug)]
pub struct ResyncPolicy {
    /// Resync when an action was made against a revision older than the
    /// host's current one, since the client predicted from stale state
    pub on_stale_revision: bool,
    pub on_prediction_mismatch: ResyncMode,
    /// Resync every session after this many calls to `Server::tick()`
    pub periodic_ticks: Option<u32>,
}

impl Default for ResyncPolicy {
    fn default() -> Self {
        Self {
            on_stale_revision: true,
            on_prediction_mismatch: ResyncMode::Corrections,
            periodic_ticks: None,
        }
    }
}

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub resync: ResyncPolicy,
    /// Opening a session beyond this count closes the user's oldest session
    /// first. `None` allows any number.
    pub max_sessions_per_user: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            resync: ResyncPolicy::default(),
            max_sessions_per_user: Some(1),
        }
    }
}
