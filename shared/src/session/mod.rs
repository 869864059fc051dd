mod error;
mod session_id;
mod session_kinds;
mod session_state;

pub use error::SessionError;
pub use session_id::SessionId;
pub use session_kinds::SessionKinds;
pub use session_state::SessionState;
