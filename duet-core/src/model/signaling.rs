use crate::model::connection::ConnectionId;
use crate::model::identity::Identity;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events a client sends over the signaling socket.
///
/// Frames are JSON objects of the form `{"event": "<name>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    JoinRoom {
        room_id: RoomId,
        user_id: Identity,
    },
    /// Opaque session description or network candidate.
    Signal {
        #[serde(default)]
        signal: Value,
    },
    /// `room_id` is carried by older clients; the joined room always wins.
    MediaStatus {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
        video: bool,
        audio: bool,
    },
    RequestReconnect,
}

/// Events the server pushes to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// First frame on every socket, so the client can recognise its own relays.
    Connected {
        connection_id: ConnectionId,
    },
    RoomFull,
    UserConnected(Identity),
    Signal {
        user_id: ConnectionId,
        signal: Value,
    },
    MediaStatus {
        user_id: ConnectionId,
        video: bool,
        audio: bool,
    },
    PeerReconnectRequest(Identity),
    UserDisconnected(Identity),
    SessionEnded,
}

impl ServerMessage {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerMessage::Connected { .. } => "connected",
            ServerMessage::RoomFull => "room-full",
            ServerMessage::UserConnected(_) => "user-connected",
            ServerMessage::Signal { .. } => "signal",
            ServerMessage::MediaStatus { .. } => "media-status",
            ServerMessage::PeerReconnectRequest(_) => "peer-reconnect-request",
            ServerMessage::UserDisconnected(_) => "user-disconnected",
            ServerMessage::SessionEnded => "session-ended",
        }
    }
}
