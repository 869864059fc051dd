use std::default::Default;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Actions per session that may await the host's ack. Going past this
    /// drops the predictions and asks the host for a full resync.
    pub max_pending_predictions: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_pending_predictions: 64,
        }
    }
}
