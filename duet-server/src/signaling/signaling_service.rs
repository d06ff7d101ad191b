use crate::session::SessionCommand;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use dashmap::DashMap;
use duet_core::{ConnectionId, RoomId, ServerMessage};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;
use tracing::{debug, error, warn};

struct ConnectionEntry {
    tx: mpsc::UnboundedSender<ServerMessage>,
    rooms: HashSet<RoomId>,
}

struct SignalingInner {
    connections: DashMap<ConnectionId, ConnectionEntry>,
    rooms: DashMap<RoomId, HashSet<ConnectionId>>,
}

/// Socket-side half of the service: owns every live connection's outbound
/// channel and the transport-level room membership used for broadcasts.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    session_tx: mpsc::Sender<SessionCommand>,
}

impl SignalingService {
    pub fn new(session_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
                rooms: DashMap::new(),
            }),
            session_tx,
        }
    }

    pub fn add_connection(&self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.inner.connections.insert(
            connection_id,
            ConnectionEntry {
                tx,
                rooms: HashSet::new(),
            },
        );
    }

    /// Forgets the connection and drops it from every room it was in.
    pub fn remove_connection(&self, connection_id: &ConnectionId) {
        let Some((_, entry)) = self.inner.connections.remove(connection_id) else {
            return;
        };
        for room_id in entry.rooms {
            self.remove_from_room(connection_id, &room_id);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    /// Hands a session event to the coordinator.
    pub async fn dispatch(&self, cmd: SessionCommand) -> Result<(), SendError<SessionCommand>> {
        self.session_tx.send(cmd).await
    }

    pub fn send_message(&self, connection_id: ConnectionId, msg: ServerMessage) {
        let Some(entry) = self.inner.connections.get(&connection_id) else {
            warn!(
                "Attempted to send {} to disconnected connection {}",
                msg.name(),
                connection_id
            );
            return;
        };
        if let Err(e) = entry.tx.send(msg) {
            error!("Failed to queue message for {}: {}", connection_id, e);
        }
    }

    fn remove_from_room(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let emptied = match self.inner.rooms.get_mut(room_id) {
            Some(mut members) => {
                members.remove(connection_id);
                members.is_empty()
            }
            None => false,
        };
        if emptied {
            self.inner.rooms.remove_if(room_id, |_, members| members.is_empty());
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send(&self, connection_id: ConnectionId, msg: ServerMessage) {
        self.send_message(connection_id, msg);
    }

    async fn broadcast(&self, room_id: &RoomId, msg: ServerMessage, except: Option<ConnectionId>) {
        // Collect first so no room guard is held while touching connection shards.
        let recipients: Vec<ConnectionId> = match self.inner.rooms.get(room_id) {
            Some(members) => members
                .iter()
                .filter(|id| Some(**id) != except)
                .copied()
                .collect(),
            None => Vec::new(),
        };

        debug!(
            "Broadcasting {} to {} connection(s) in room {}",
            msg.name(),
            recipients.len(),
            room_id
        );

        for connection_id in recipients {
            self.send_message(connection_id, msg.clone());
        }
    }

    async fn join_room(&self, connection_id: ConnectionId, room_id: &RoomId) {
        let Some(mut entry) = self.inner.connections.get_mut(&connection_id) else {
            debug!("Connection {} vanished before joining room {}", connection_id, room_id);
            return;
        };
        entry.rooms.insert(room_id.clone());
        drop(entry);

        self.inner
            .rooms
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id);
    }

    async fn leave_room(&self, connection_id: ConnectionId, room_id: &RoomId) {
        if let Some(mut entry) = self.inner.connections.get_mut(&connection_id) {
            entry.rooms.remove(room_id);
        }
        self.remove_from_room(&connection_id, room_id);
    }

    async fn rooms_of(&self, connection_id: ConnectionId) -> Vec<RoomId> {
        self.inner
            .connections
            .get(&connection_id)
            .map(|entry| entry.rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.inner
            .rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }
}
