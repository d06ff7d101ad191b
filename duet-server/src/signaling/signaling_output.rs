use async_trait::async_trait;
use duet_core::{ConnectionId, RoomId, ServerMessage};

/// What the session coordinator needs from the transport that carries client sockets.
///
/// Room membership here is transport-level: it only decides who receives a
/// broadcast. Application-level membership lives in the room directory.
/// Every method is fire-and-forget; delivery failures are the transport's to log.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Send an event to one connection.
    async fn send(&self, connection_id: ConnectionId, msg: ServerMessage);

    /// Send an event to every connection in the room, optionally skipping one.
    async fn broadcast(&self, room_id: &RoomId, msg: ServerMessage, except: Option<ConnectionId>);

    async fn join_room(&self, connection_id: ConnectionId, room_id: &RoomId);

    async fn leave_room(&self, connection_id: ConnectionId, room_id: &RoomId);

    async fn rooms_of(&self, connection_id: ConnectionId) -> Vec<RoomId>;

    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId>;
}
