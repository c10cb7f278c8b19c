/**
 * Presence Registry
 *
 * Maps an identity to at most one live WebSocket connection. The registry
 * is pure in-memory process state: constructed once at startup, injected
 * through `AppState`, gone at shutdown. It owns nothing persisted.
 *
 * # Last connection wins
 *
 * Re-registering an identity overwrites the previous mapping; there is no
 * multi-device fan-out. Because a fast reconnect can land before the old
 * connection's disconnect is processed, each mapping remembers which
 * connection created it, and `disconnect` only removes the entry if that
 * connection still owns it. Without the guard, the stale disconnect would
 * evict the fresh connection.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Identity -> live connection mapping
///
/// Cheap to clone; all clones share the same map. The mutex is only held
/// for map operations, never across an await point.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    connections: Arc<Mutex<HashMap<Uuid, Uuid>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `conn_id` as the live connection for `user_id`, replacing
    /// any previous connection for that identity.
    pub fn connect(&self, user_id: Uuid, conn_id: Uuid) {
        let mut connections = self.connections.lock().unwrap();
        if let Some(previous) = connections.insert(user_id, conn_id) {
            if previous != conn_id {
                tracing::debug!(%user_id, "presence remapped to a newer connection");
            }
        }
    }

    /// Drop the mapping owned by `conn_id`, if any, and return the identity
    /// that went offline. Returns `None` when the connection never
    /// identified itself or the identity has since reconnected elsewhere.
    pub fn disconnect(&self, conn_id: Uuid) -> Option<Uuid> {
        let mut connections = self.connections.lock().unwrap();
        let user_id = connections
            .iter()
            .find(|(_, c)| **c == conn_id)
            .map(|(u, _)| *u)?;
        connections.remove(&user_id);
        Some(user_id)
    }

    /// Whether the identity currently has a live connection
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.connections.lock().unwrap().contains_key(&user_id)
    }

    /// The connection currently mapped to an identity
    pub fn connection_of(&self, user_id: Uuid) -> Option<Uuid> {
        self.connections.lock().unwrap().get(&user_id).copied()
    }

    /// Snapshot of all online identities
    pub fn online_users(&self) -> Vec<Uuid> {
        self.connections.lock().unwrap().keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_and_disconnect() {
        let registry = PresenceRegistry::new();
        let user = Uuid::new_v4();
        let conn = Uuid::new_v4();

        registry.connect(user, conn);
        assert!(registry.is_online(user));

        assert_eq!(registry.disconnect(conn), Some(user));
        assert!(!registry.is_online(user));
    }

    #[test]
    fn test_last_connection_wins() {
        let registry = PresenceRegistry::new();
        let user = Uuid::new_v4();
        let old_conn = Uuid::new_v4();
        let new_conn = Uuid::new_v4();

        registry.connect(user, old_conn);
        registry.connect(user, new_conn);

        assert_eq!(registry.connection_of(user), Some(new_conn));
    }

    #[test]
    fn test_stale_disconnect_does_not_evict_reconnected_user() {
        let registry = PresenceRegistry::new();
        let user = Uuid::new_v4();
        let old_conn = Uuid::new_v4();
        let new_conn = Uuid::new_v4();

        registry.connect(user, old_conn);
        // User reconnects before the old connection's disconnect arrives
        registry.connect(user, new_conn);

        // The late disconnect of the old connection must be a no-op
        assert_eq!(registry.disconnect(old_conn), None);
        assert!(registry.is_online(user));
        assert_eq!(registry.connection_of(user), Some(new_conn));
    }

    #[test]
    fn test_disconnect_of_unidentified_connection() {
        let registry = PresenceRegistry::new();
        assert_eq!(registry.disconnect(Uuid::new_v4()), None);
    }

    #[test]
    fn test_online_users_snapshot() {
        let registry = PresenceRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        registry.connect(a, Uuid::new_v4());
        registry.connect(b, Uuid::new_v4());

        let mut online = registry.online_users();
        online.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(online, expected);
    }
}
