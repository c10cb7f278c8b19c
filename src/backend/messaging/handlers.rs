//! Message Endpoint Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::messaging::pipeline;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::message::{
    MarkAllReadRequest, MarkAllReadResponse, Message, SendMessageRequest, UpdateStatusRequest,
};

/// Send a message (POST /api/messages/send/{receiver_id})
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(receiver_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = pipeline::send_message(&state, auth.user_id, receiver_id, request).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Conversation history with a peer (GET /api/messages/{peer_id})
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = pipeline::get_messages(&state, auth.user_id, peer_id).await?;
    Ok(Json(messages))
}

/// Advance one message's status (PATCH /api/messages/{id}/status)
pub async fn update_message_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(message_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    pipeline::update_message_status(&state, message_id, &request.status).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Mark a whole conversation read (POST /api/messages/read)
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<MarkAllReadRequest>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated_count = pipeline::mark_all_read(&state, auth.user_id, request.sender_id).await?;
    Ok(Json(MarkAllReadResponse { updated_count }))
}
