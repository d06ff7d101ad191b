use duet_core::{ClientMessage, ConnectionId, Identity, RoomId};
use serde_json::Value;

/// Events delivered to the coordinator by the transport, one per client frame
/// plus the connection lifecycle edges.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// A socket was accepted and given an id.
    Connect { connection_id: ConnectionId },

    JoinRoom {
        connection_id: ConnectionId,
        room_id: RoomId,
        identity: Identity,
    },

    Signal {
        connection_id: ConnectionId,
        signal: Value,
    },

    MediaStatus {
        connection_id: ConnectionId,
        video: bool,
        audio: bool,
    },

    RequestReconnect { connection_id: ConnectionId },

    /// The socket is gone. Delivered exactly once per connection.
    Disconnect { connection_id: ConnectionId },
}

impl SessionCommand {
    pub fn connection_id(&self) -> ConnectionId {
        match self {
            SessionCommand::Connect { connection_id }
            | SessionCommand::JoinRoom { connection_id, .. }
            | SessionCommand::Signal { connection_id, .. }
            | SessionCommand::MediaStatus { connection_id, .. }
            | SessionCommand::RequestReconnect { connection_id }
            | SessionCommand::Disconnect { connection_id } => *connection_id,
        }
    }
}

impl SessionCommand {
    /// Maps a decoded client frame onto the command for its connection.
    pub fn from_client(connection_id: ConnectionId, msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::JoinRoom { room_id, user_id } => SessionCommand::JoinRoom {
                connection_id,
                room_id,
                identity: user_id,
            },
            ClientMessage::Signal { signal } => SessionCommand::Signal {
                connection_id,
                signal,
            },
            ClientMessage::MediaStatus { video, audio, .. } => SessionCommand::MediaStatus {
                connection_id,
                video,
                audio,
            },
            ClientMessage::RequestReconnect => SessionCommand::RequestReconnect { connection_id },
        }
    }
}
