/**
 * Server Initialization
 *
 * Assembles the application: stores, media collaborator, presence
 * registry, event bus, router.
 *
 * # Initialization Process
 *
 * 1. Load the database pool; pick the Postgres or in-memory store backing
 * 2. Load the media-store collaborator
 * 3. Create the presence registry and event bus (process-scoped)
 * 4. Build the router over the assembled state
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::presence::PresenceRegistry;
use crate::backend::realtime::broadcast::event_bus;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, load_media_store};
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, PgStore};

/// Create and configure the Axum application
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing server");

    let media = load_media_store();

    let state = match load_database().await {
        Some(pool) => {
            let store = Arc::new(PgStore::new(pool));
            AppState {
                users: store.clone(),
                graph: store.clone(),
                messages: store,
                media,
                presence: PresenceRegistry::new(),
                events: event_bus(),
            }
        }
        None => {
            let store = Arc::new(MemoryStore::new());
            AppState {
                users: store.clone(),
                graph: store.clone(),
                messages: store,
                media,
                presence: PresenceRegistry::new(),
                events: event_bus(),
            }
        }
    };

    tracing::info!("State assembled; configuring router");
    create_router(state)
}
