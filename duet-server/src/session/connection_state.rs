use duet_core::{Identity, RoomId};

/// Lifecycle of one physical connection as seen by the coordinator.
///
/// Closed connections are dropped from the coordinator's table, so a missing
/// entry and `Closed` mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unjoined,
    Joined { room_id: RoomId, identity: Identity },
}

impl ConnectionState {
    pub fn is_joined(&self) -> bool {
        matches!(self, ConnectionState::Joined { .. })
    }
}
