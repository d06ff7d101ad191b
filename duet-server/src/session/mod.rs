mod connection_registry;
mod connection_state;
mod session_command;
mod session_coordinator;

pub use connection_registry::*;
pub use connection_state::*;
pub use session_command::*;
pub use session_coordinator::*;
