//! User Endpoint Handlers
//!
//! Directory listing, profiles, profile updates (including avatar upload
//! through the media collaborator), and account deletion.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::media::{decode_image_payload, upload_with_retry};
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::users::store::ProfileUpdate;
use crate::shared::user::{UpdateProfileRequest, UserProfile, UserSummary};

/// Everyone except the caller (GET /api/users)
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let records = state.users.list_except(auth.user_id).await?;
    Ok(Json(records.iter().map(|r| r.summary()).collect()))
}

/// One user's profile (GET /api/users/{id})
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    let record = state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let counts = state.graph.counts(user_id).await?;
    Ok(Json(record.profile(counts)))
}

/// Update the caller's profile (PUT /api/users/profile)
///
/// An inline avatar goes through the media collaborator first; if the
/// upload exhausts its retries the whole update fails and nothing is
/// written.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let avatar_url = match request.avatar.filter(|a| !a.is_empty()) {
        Some(payload) => {
            let bytes = decode_image_payload(&payload)?;
            Some(upload_with_retry(state.media.as_ref(), &bytes).await?)
        }
        None => None,
    };

    let record = state
        .users
        .update_profile(
            auth.user_id,
            ProfileUpdate {
                display_name: request.display_name,
                bio: request.bio,
                birthday: request.birthday,
                avatar_url,
            },
        )
        .await?;
    tracing::info!(user_id = %auth.user_id, "profile updated");

    let counts = state.graph.counts(auth.user_id).await?;
    Ok(Json(record.profile(counts)))
}

/// Delete the caller's account (DELETE /api/users/me)
///
/// The identity is cascaded out of every other user's graph state in the
/// same storage operation. Messages are retained.
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.users.delete(auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, "account deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}
