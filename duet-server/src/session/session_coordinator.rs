use crate::error::SessionError;
use crate::room::{JoinOutcome, RoomDirectory};
use crate::session::connection_registry::ConnectionRegistry;
use crate::session::connection_state::ConnectionState;
use crate::session::session_command::SessionCommand;
use crate::signaling::SignalingOutput;
use duet_core::{ConnectionId, Identity, RoomId, ServerMessage};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Owns every piece of room and identity state and applies session events to it
/// one at a time.
pub struct SessionCoordinator {
    registry: ConnectionRegistry,
    directory: RoomDirectory,
    connections: HashMap<ConnectionId, ConnectionState>,
    output: Arc<dyn SignalingOutput>,
}

impl SessionCoordinator {
    pub fn new(output: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            directory: RoomDirectory::new(),
            connections: HashMap::new(),
            output,
        }
    }

    pub async fn run(mut self, mut command_rx: mpsc::Receiver<SessionCommand>) {
        info!("Session coordinator started");

        while let Some(cmd) = command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Shutting down session coordinator.");
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn connection_state(&self, connection_id: &ConnectionId) -> Option<&ConnectionState> {
        self.connections.get(connection_id)
    }

    pub async fn handle_command(&mut self, cmd: SessionCommand) {
        let connection_id = cmd.connection_id();

        let result = match cmd {
            SessionCommand::Connect { connection_id } => {
                self.connect(connection_id);
                Ok(())
            }
            SessionCommand::JoinRoom {
                connection_id,
                room_id,
                identity,
            } => self.join_room(connection_id, room_id, identity).await.map(|_| ()),
            SessionCommand::Signal {
                connection_id,
                signal,
            } => self.relay_signal(connection_id, signal).await,
            SessionCommand::MediaStatus {
                connection_id,
                video,
                audio,
            } => self.relay_media_status(connection_id, video, audio).await,
            SessionCommand::RequestReconnect { connection_id } => {
                self.request_reconnect(connection_id).await
            }
            SessionCommand::Disconnect { connection_id } => {
                self.disconnect(connection_id).await;
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(SessionError::RoomFull { .. }) => {
                self.output.send(connection_id, ServerMessage::RoomFull).await;
            }
            Err(e) => debug!("Ignored event from {}: {}", connection_id, e),
        }
    }

    fn connect(&mut self, connection_id: ConnectionId) {
        self.connections
            .entry(connection_id)
            .or_insert(ConnectionState::Unjoined);
        debug!("Connection {} registered", connection_id);
    }

    pub async fn join_room(
        &mut self,
        connection_id: ConnectionId,
        room_id: RoomId,
        identity: Identity,
    ) -> Result<JoinOutcome, SessionError> {
        match self.connections.get(&connection_id) {
            None => return Err(SessionError::ConnectionClosed { connection_id }),
            Some(ConnectionState::Joined { room_id: current, .. }) => {
                return Err(SessionError::AlreadyJoined {
                    connection_id,
                    room_id: current.clone(),
                });
            }
            Some(ConnectionState::Unjoined) => {}
        }

        for previous in self.output.rooms_of(connection_id).await {
            self.output.leave_room(connection_id, &previous).await;
        }

        let superseded = self.registry.bind(identity.clone(), connection_id);

        let outcome = self.directory.join_or_create(&room_id, &identity);
        if !outcome.is_admitted() {
            return Err(SessionError::RoomFull { room_id });
        }

        if let Some(superseded) = superseded {
            self.evict_superseded(superseded).await;
        }

        self.output.join_room(connection_id, &room_id).await;
        self.connections.insert(
            connection_id,
            ConnectionState::Joined {
                room_id: room_id.clone(),
                identity: identity.clone(),
            },
        );

        // On a rejoin this re-announces presence so the peer restarts negotiation.
        self.output
            .broadcast(
                &room_id,
                ServerMessage::UserConnected(identity),
                Some(connection_id),
            )
            .await;

        Ok(outcome)
    }

    /// The superseded socket stays open but stops hearing its old room.
    async fn evict_superseded(&self, superseded: ConnectionId) {
        if let Some(ConnectionState::Joined { room_id, .. }) = self.connections.get(&superseded) {
            debug!("Evicting superseded connection {} from room {}", superseded, room_id);
            self.output.leave_room(superseded, room_id).await;
        }
    }

    /// Resolves a relaying connection to its room, refusing stale or orphaned senders.
    fn active_member(&self, connection_id: ConnectionId) -> Result<(RoomId, Identity), SessionError> {
        let (room_id, identity) = match self.connections.get(&connection_id) {
            None => return Err(SessionError::ConnectionClosed { connection_id }),
            Some(ConnectionState::Unjoined) => return Err(SessionError::NotJoined { connection_id }),
            Some(ConnectionState::Joined { room_id, identity }) => (room_id, identity),
        };

        if !self.registry.is_active_binding(identity, &connection_id) {
            return Err(SessionError::StaleConnection {
                connection_id,
                identity: identity.clone(),
            });
        }
        if !self.directory.is_member(room_id, identity) {
            return Err(SessionError::UnknownRoomOrIdentity {
                room_id: room_id.clone(),
                identity: identity.clone(),
            });
        }

        Ok((room_id.clone(), identity.clone()))
    }

    pub async fn relay_signal(
        &self,
        connection_id: ConnectionId,
        signal: Value,
    ) -> Result<(), SessionError> {
        let (room_id, _) = self.active_member(connection_id)?;

        // The sender gets its own echo and filters it by `user_id`.
        let msg = ServerMessage::Signal {
            user_id: connection_id,
            signal,
        };
        self.output.broadcast(&room_id, msg, None).await;
        Ok(())
    }

    pub async fn relay_media_status(
        &self,
        connection_id: ConnectionId,
        video: bool,
        audio: bool,
    ) -> Result<(), SessionError> {
        let (room_id, _) = self.active_member(connection_id)?;

        let msg = ServerMessage::MediaStatus {
            user_id: connection_id,
            video,
            audio,
        };
        self.output.broadcast(&room_id, msg, Some(connection_id)).await;
        Ok(())
    }

    pub async fn request_reconnect(&self, connection_id: ConnectionId) -> Result<(), SessionError> {
        let (room_id, identity) = self.active_member(connection_id)?;

        info!("User {} requesting reconnection in room {}", identity, room_id);
        self.output
            .broadcast(
                &room_id,
                ServerMessage::PeerReconnectRequest(identity),
                Some(connection_id),
            )
            .await;
        Ok(())
    }

    pub async fn disconnect(&mut self, connection_id: ConnectionId) {
        let Some(state) = self.connections.remove(&connection_id) else {
            debug!("Duplicate disconnect for {}", connection_id);
            return;
        };

        let ConnectionState::Joined { room_id, identity } = state else {
            // A refused join still bound the identity.
            self.registry.unbind(&connection_id);
            info!("Connection {} closed without joining a room", connection_id);
            return;
        };

        if !self.registry.is_active_binding(&identity, &connection_id) {
            // If the identity moved to another room, `room_id` keeps it as a member
            // and is never reclaimed.
            self.registry.unbind(&connection_id);
            self.output.leave_room(connection_id, &room_id).await;
            debug!(
                "Stale connection {} for {} closed, membership kept",
                connection_id, identity
            );
            return;
        }

        self.registry.unbind(&connection_id);
        self.output.leave_room(connection_id, &room_id).await;

        let is_creator = self.directory.creator_of(&room_id) == Some(&identity);
        if is_creator {
            self.end_session(connection_id, &room_id).await;
            info!("Creator {} left, session in room {} ended", identity, room_id);
            return;
        }

        if self.directory.leave(&room_id, &identity) {
            self.output
                .broadcast(
                    &room_id,
                    ServerMessage::UserDisconnected(identity.clone()),
                    Some(connection_id),
                )
                .await;
        }
        info!("User {} left room {}", identity, room_id);
    }

    async fn end_session(&mut self, creator_connection: ConnectionId, room_id: &RoomId) {
        self.output
            .broadcast(room_id, ServerMessage::SessionEnded, Some(creator_connection))
            .await;

        self.directory.dissolve(room_id);

        for member in self.output.members_of(room_id).await {
            self.output.leave_room(member, room_id).await;
        }
    }
}
