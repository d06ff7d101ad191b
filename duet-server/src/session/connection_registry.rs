use duet_core::{ConnectionId, Identity};
use std::collections::HashMap;
use tracing::info;

/// Two-way binding between identities and the connection currently speaking for them.
///
/// Both indexes are only ever touched together through `bind`/`unbind`.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    by_identity: HashMap<Identity, ConnectionId>,
    by_connection: HashMap<ConnectionId, Identity>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `connection_id` the active connection for `identity`.
    ///
    /// Returns the connection that was superseded, if any. The superseded
    /// connection keeps running but no longer resolves to an identity.
    pub fn bind(&mut self, identity: Identity, connection_id: ConnectionId) -> Option<ConnectionId> {
        let superseded = match self.by_identity.get(&identity) {
            Some(old) if *old != connection_id => {
                let old = *old;
                info!("Identity {} reconnecting, superseding connection {}", identity, old);
                self.by_connection.remove(&old);
                Some(old)
            }
            _ => None,
        };

        // A connection may switch identities; drop its previous forward entry.
        if let Some(previous) = self.by_connection.get(&connection_id) {
            if *previous != identity && self.by_identity.get(previous) == Some(&connection_id) {
                self.by_identity.remove(previous);
            }
        }

        self.by_identity.insert(identity.clone(), connection_id);
        self.by_connection.insert(connection_id, identity);

        superseded
    }

    pub fn identity_of(&self, connection_id: &ConnectionId) -> Option<&Identity> {
        self.by_connection.get(connection_id)
    }

    pub fn connection_of(&self, identity: &Identity) -> Option<ConnectionId> {
        self.by_identity.get(identity).copied()
    }

    /// True only while `connection_id` is the active connection for `identity`.
    pub fn is_active_binding(&self, identity: &Identity, connection_id: &ConnectionId) -> bool {
        self.by_identity.get(identity) == Some(connection_id)
    }

    pub fn unbind(&mut self, connection_id: &ConnectionId) {
        let Some(identity) = self.by_connection.remove(connection_id) else {
            return;
        };
        if self.by_identity.get(&identity) == Some(connection_id) {
            self.by_identity.remove(&identity);
        }
    }

    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }
}
