//! Follow Endpoint Handlers
//!
//! Thin HTTP layer over the follow workflow. Handlers authenticate, call
//! the workflow, and serialize its result; every failure mode arrives as
//! an `ApiError` and maps itself to a response.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::social::workflow;
use crate::shared::follow::{FollowCounts, PendingRequestsResponse};
use crate::shared::user::UserSummary;

/// Send a follow request (POST /api/users/follow-request/{id})
pub async fn send_follow_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<UserSummary>, ApiError> {
    let receiver = workflow::send_request(&state, auth.user_id, target_id).await?;
    Ok(Json(receiver))
}

/// Accept a pending follow request (POST /api/users/accept-request/{id})
pub async fn accept_follow_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(requester_id): Path<Uuid>,
) -> Result<Json<UserSummary>, ApiError> {
    let follower = workflow::accept_request(&state, auth.user_id, requester_id).await?;
    Ok(Json(follower))
}

/// Reject a pending follow request (POST /api/users/reject-request/{id})
pub async fn reject_follow_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(requester_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    workflow::reject_request(&state, auth.user_id, requester_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Follow directly, without a request (POST /api/users/follow/{id})
pub async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<FollowCounts>, ApiError> {
    let counts = workflow::follow_user(&state, auth.user_id, target_id).await?;
    Ok(Json(counts))
}

/// Remove a follow edge (POST /api/users/unfollow/{id})
pub async fn unfollow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<FollowCounts>, ApiError> {
    let counts = workflow::unfollow_user(&state, auth.user_id, target_id).await?;
    Ok(Json(counts))
}

/// Inbound follow requests pending on the caller (GET /api/users/requests)
pub async fn pending_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PendingRequestsResponse>, ApiError> {
    let requester_ids = state.graph.pending_requests(auth.user_id).await?;
    let mut requests = Vec::with_capacity(requester_ids.len());
    for id in requester_ids {
        // A requester deleted since asking simply drops out of the list
        if let Some(record) = state.users.get(id).await? {
            requests.push(record.summary());
        }
    }
    Ok(Json(PendingRequestsResponse { requests }))
}

/// Users following `id` (GET /api/users/{id}/followers)
pub async fn followers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let ids = state.graph.followers_of(user_id).await?;
    summaries(&state, ids).await.map(Json)
}

/// Users `id` follows (GET /api/users/{id}/following)
pub async fn following(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let ids = state.graph.following_of(user_id).await?;
    summaries(&state, ids).await.map(Json)
}

async fn summaries(state: &AppState, ids: Vec<Uuid>) -> Result<Vec<UserSummary>, ApiError> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(record) = state.users.get(id).await? {
            out.push(record.summary());
        }
    }
    Ok(out)
}
