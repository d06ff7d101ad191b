//! Rendezvous and relay service for two-party real-time media sessions.
//!
//! Clients connect over a WebSocket, join a room under a stable identity and
//! then exchange session descriptions, network candidates and media status
//! through the server. The server never touches media; it tracks who is in
//! which room and who created it, and ends the session for both sides when
//! the creator leaves.

mod config;
mod error;
mod room;
mod server;
mod session;
mod signaling;

pub use config::*;
pub use error::*;
pub use room::*;
pub use server::*;
pub use session::*;
pub use signaling::*;
