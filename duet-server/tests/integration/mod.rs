//! Integration tests for duet_server.
//!
//! Tests are organized by functionality:
//! - `join_tests` - room creation, capacity and rejoin
//! - `relay_tests` - signal, media-status and reconnect-request scoping
//! - `disconnect_tests` - creator teardown, peer departure, stale sockets
//! - `transport_tests` - coordinator loop and the WebSocket front end


use tracing::Level;

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}
