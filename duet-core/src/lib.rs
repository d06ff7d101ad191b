//! Shared model for the duet rendezvous service: identifiers and the JSON
//! event protocol spoken over the signaling socket.

pub mod model;

pub use model::*;
