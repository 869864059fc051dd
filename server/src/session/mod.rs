mod host_session;
mod session_context;
mod session_handler;

pub use host_session::HostSession;
pub use session_context::SessionContext;
pub use session_handler::{HandlerFactory, SessionHandler};
