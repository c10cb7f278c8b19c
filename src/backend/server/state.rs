/**
 * Application State Management
 *
 * This module defines the application state structure and the `FromRef`
 * implementations for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container, assembled once at startup and
 * cloned into every handler:
 * - the three store handles (users, graph, messages), each an `Arc<dyn …>`
 *   so the Postgres and in-memory backings are interchangeable
 * - the media collaborator handle
 * - the presence registry (process-wide, in-memory)
 * - the real-time event bus
 *
 * # Thread Safety
 *
 * Everything here is cheaply cloneable and safe for concurrent access: the
 * stores synchronize internally, the presence registry wraps its map in a
 * mutex, and the event bus is a `tokio::sync::broadcast` sender.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::media::MediaStore;
use crate::backend::messaging::store::MessageStore;
use crate::backend::presence::PresenceRegistry;
use crate::backend::realtime::broadcast::EventBus;
use crate::backend::social::store::GraphStore;
use crate::backend::users::store::UserStore;

/// Application state shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    /// User records
    pub users: Arc<dyn UserStore>,

    /// Follow/follower/request edges
    pub graph: Arc<dyn GraphStore>,

    /// Direct messages
    pub messages: Arc<dyn MessageStore>,

    /// External blob storage boundary
    pub media: Arc<dyn MediaStore>,

    /// Identity -> live connection registry
    ///
    /// Constructed at process start, torn down at shutdown; never shared
    /// across processes.
    pub presence: PresenceRegistry,

    /// Real-time event bus feeding every WebSocket connection
    pub events: EventBus,
}

impl FromRef<AppState> for PresenceRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

impl FromRef<AppState> for EventBus {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.events.clone()
    }
}
