/**
 * API Route Table
 *
 * All REST endpoints. Authentication is enforced per-handler through the
 * `AuthUser` extractor; every route below requires a bearer token.
 */

use axum::Router;

use crate::backend::messaging::handlers::{
    get_messages, mark_all_read, send_message, update_message_status,
};
use crate::backend::server::state::AppState;
use crate::backend::social::handlers::{
    accept_follow_request, follow, followers, following, pending_requests,
    reject_follow_request, send_follow_request, unfollow,
};
use crate::backend::users::handlers::{delete_account, get_user, list_users, update_profile};

/// Configure API routes
///
/// ## User directory and profile
/// - `GET /api/users` - everyone except the caller
/// - `GET /api/users/{id}` - one profile with follow counts
/// - `PUT /api/users/profile` - update the caller's profile
/// - `DELETE /api/users/me` - delete the caller's account
///
/// ## Follow workflow
/// - `GET /api/users/requests` - pending inbound requests
/// - `POST /api/users/follow-request/{id}` - ask to follow
/// - `POST /api/users/accept-request/{id}` - accept a request
/// - `POST /api/users/reject-request/{id}` - reject a request
/// - `POST /api/users/follow/{id}` - follow directly
/// - `POST /api/users/unfollow/{id}` - remove a follow edge
/// - `GET /api/users/{id}/followers` / `GET /api/users/{id}/following`
///
/// ## Messaging
/// - `GET /api/messages/{peer_id}` - history, oldest first
/// - `POST /api/messages/send/{receiver_id}` - send (201 on success)
/// - `PATCH /api/messages/{id}/status` - advance delivery status
/// - `POST /api/messages/read` - mark a whole conversation read
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // User directory and profile
        .route("/api/users", axum::routing::get(list_users))
        .route("/api/users/profile", axum::routing::put(update_profile))
        .route("/api/users/me", axum::routing::delete(delete_account))
        // Follow workflow; static segments before the `{id}` catch-all
        .route("/api/users/requests", axum::routing::get(pending_requests))
        .route(
            "/api/users/follow-request/{id}",
            axum::routing::post(send_follow_request),
        )
        .route(
            "/api/users/accept-request/{id}",
            axum::routing::post(accept_follow_request),
        )
        .route(
            "/api/users/reject-request/{id}",
            axum::routing::post(reject_follow_request),
        )
        .route("/api/users/follow/{id}", axum::routing::post(follow))
        .route("/api/users/unfollow/{id}", axum::routing::post(unfollow))
        .route("/api/users/{id}/followers", axum::routing::get(followers))
        .route("/api/users/{id}/following", axum::routing::get(following))
        .route("/api/users/{id}", axum::routing::get(get_user))
        // Messaging
        .route(
            "/api/messages/send/{receiver_id}",
            axum::routing::post(send_message),
        )
        .route("/api/messages/read", axum::routing::post(mark_all_read))
        .route(
            "/api/messages/{id}/status",
            axum::routing::patch(update_message_status),
        )
        .route("/api/messages/{peer_id}", axum::routing::get(get_messages))
}
