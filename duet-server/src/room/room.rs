use duet_core::Identity;
use std::collections::BTreeSet;

/// Maximum number of distinct identities a room admits.
pub const ROOM_CAPACITY: usize = 2;

/// Application-level membership of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    members: BTreeSet<Identity>,
    creator: Identity,
}

impl Room {
    pub(crate) fn new(creator: Identity) -> Self {
        let mut members = BTreeSet::new();
        members.insert(creator.clone());
        Self { members, creator }
    }

    pub fn creator(&self) -> &Identity {
        &self.creator
    }

    pub fn members(&self) -> impl Iterator<Item = &Identity> {
        self.members.iter()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.members.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub(crate) fn insert(&mut self, identity: Identity) -> bool {
        self.members.insert(identity)
    }

    pub(crate) fn remove(&mut self, identity: &Identity) -> bool {
        self.members.remove(identity)
    }
}
