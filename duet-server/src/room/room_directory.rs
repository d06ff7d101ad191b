use crate::room::Room;
use duet_core::{Identity, RoomId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::info;

/// Result of asking the directory to admit an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The room did not exist; the identity is its creator and only member.
    Created,
    /// The identity took the free slot of an existing room.
    Joined,
    /// The identity was already a member. Membership is unchanged.
    Rejoined,
    /// Two other identities hold the room. Nothing was changed.
    Full,
}

impl JoinOutcome {
    pub fn is_admitted(self) -> bool {
        !matches!(self, JoinOutcome::Full)
    }
}

/// Room id → membership and creator.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, Room>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join_or_create(&mut self, room_id: &RoomId, identity: &Identity) -> JoinOutcome {
        let room = match self.rooms.entry(room_id.clone()) {
            Entry::Vacant(slot) => {
                info!("User {} created room {}", identity, room_id);
                slot.insert(Room::new(identity.clone()));
                return JoinOutcome::Created;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if room.contains(identity) {
            info!("User {} rejoined room {}", identity, room_id);
            return JoinOutcome::Rejoined;
        }

        if room.is_full() {
            info!("User {} refused, room {} is full", identity, room_id);
            return JoinOutcome::Full;
        }

        room.insert(identity.clone());
        info!("User {} joined room {}", identity, room_id);
        JoinOutcome::Joined
    }

    /// Removes `identity` from the room, deleting the room once it is empty.
    ///
    /// Returns whether the identity was a member.
    pub fn leave(&mut self, room_id: &RoomId, identity: &Identity) -> bool {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return false;
        };
        if !room.remove(identity) {
            return false;
        }

        if room.is_empty() {
            self.rooms.remove(room_id);
            info!("Room {} is empty and has been deleted", room_id);
        }
        true
    }

    pub fn creator_of(&self, room_id: &RoomId) -> Option<&Identity> {
        self.rooms.get(room_id).map(Room::creator)
    }

    /// Deletes the room regardless of who is still in it.
    pub fn dissolve(&mut self, room_id: &RoomId) -> Option<Room> {
        let room = self.rooms.remove(room_id)?;
        info!("Room {} dissolved by its creator {}", room_id, room.creator());
        Some(room)
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn is_member(&self, room_id: &RoomId, identity: &Identity) -> bool {
        self.rooms.get(room_id).is_some_and(|room| room.contains(identity))
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
