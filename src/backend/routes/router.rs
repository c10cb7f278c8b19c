/**
 * Router Configuration
 *
 * Combines the WebSocket endpoint and the API route table into the single
 * Axum router the server (and the test suite) runs against.
 */

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::realtime::socket::handle_socket_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Routes
///
/// - `GET /ws` - the real-time channel, one connection per active client
/// - `/api/users/...` - directory, profile, and follow-workflow endpoints
/// - `/api/messages/...` - message history, send, and status endpoints
///
/// Unknown routes fall through to a plain 404.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/ws", axum::routing::get(handle_socket_upgrade));

    let router = configure_api_routes(router);

    let router = router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .fallback(|| async { "404 Not Found" });

    router.with_state(app_state)
}
