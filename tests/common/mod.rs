//! Common test utilities
//!
//! Builds a full application over the in-memory store, creates users, and
//! mints session tokens the way the external auth service would.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use uuid::Uuid;

use perch::backend::auth::sessions::create_token;
use perch::backend::media::{LocalMediaStore, MediaStore};
use perch::backend::presence::PresenceRegistry;
use perch::backend::realtime::broadcast::event_bus;
use perch::backend::routes::create_router;
use perch::backend::server::state::AppState;
use perch::backend::store::MemoryStore;
use perch::backend::users::store::{NewUser, UserStore};

/// A running application over in-memory state
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// Build the application with the in-memory store and a local media store
pub fn spawn_app() -> TestApp {
    let media_dir = std::env::temp_dir().join(format!("perch-test-media-{}", Uuid::new_v4()));
    spawn_app_with_media(Arc::new(LocalMediaStore::new(media_dir, "/media")))
}

/// Build the application with a specific media collaborator
pub fn spawn_app_with_media(media: Arc<dyn MediaStore>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        users: store.clone(),
        graph: store.clone(),
        messages: store,
        media,
        presence: PresenceRegistry::new(),
        events: event_bus(),
    };
    let server = TestServer::new(create_router(state.clone())).expect("failed to build TestServer");
    TestApp { server, state }
}

/// Test user credentials
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

/// Create a user record and mint a session token for it
pub async fn create_test_user(state: &AppState, username: &str) -> TestUser {
    let record = state
        .users
        .create(NewUser {
            username: username.to_string(),
            display_name: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "external-auth-service-hash".to_string(),
        })
        .await
        .expect("failed to create test user");

    let token = create_token(record.id, record.email.clone()).expect("failed to mint test token");

    TestUser {
        id: record.id,
        username: record.username,
        token,
    }
}

/// Authorization header value
pub fn bearer(user: &TestUser) -> axum::http::HeaderValue {
    axum::http::HeaderValue::from_str(&format!("Bearer {}", user.token))
        .expect("token is a valid header value")
}

/// Mark an identity online with a fresh connection handle
pub fn go_online(state: &AppState, user: &TestUser) -> Uuid {
    let conn_id = Uuid::new_v4();
    state.presence.connect(user.id, conn_id);
    conn_id
}
