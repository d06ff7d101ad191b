use duet_core::{ConnectionId, Identity, RoomId};
use thiserror::Error;

/// Ways a session event can fail to take effect.
///
/// None of these are fatal. `RoomFull` is reported to the client, the rest
/// are absorbed by the coordinator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("room {room_id} already has two participants")]
    RoomFull { room_id: RoomId },

    #[error("connection {connection_id} no longer speaks for {identity}")]
    StaleConnection {
        connection_id: ConnectionId,
        identity: Identity,
    },

    #[error("connection {connection_id} has not joined a room")]
    NotJoined { connection_id: ConnectionId },

    #[error("connection {connection_id} is already in room {room_id}")]
    AlreadyJoined {
        connection_id: ConnectionId,
        room_id: RoomId,
    },

    #[error("connection {connection_id} is closed or was never opened")]
    ConnectionClosed { connection_id: ConnectionId },

    #[error("{identity} is not a member of room {room_id}")]
    UnknownRoomOrIdentity { room_id: RoomId, identity: Identity },
}
