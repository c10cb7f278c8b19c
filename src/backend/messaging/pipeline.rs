/**
 * Delivery Pipeline
 *
 * The ordered path every message takes:
 *
 * 1. Gate check - sender and receiver must mutually follow each other
 * 2. Validation - a message carries text, an image, or both, never neither
 * 3. Media resolution - an inline image is uploaded (bounded retry) before
 *    anything is persisted; an exhausted upload aborts the send with no
 *    partial message
 * 4. Persistence - status starts at `sent`
 * 5. Push - if the receiver is online, a `newMessage` event is pushed;
 *    offline receivers are not an error, the message waits for their next
 *    history fetch
 * 6. The persisted message is returned to the caller; the push is
 *    fire-and-forget and never awaited for the response
 *
 * Status updates move strictly forward (sent -> delivered -> read); a
 * request for a lower-or-equal status is a silent no-op.
 */

use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::media::{decode_image_payload, upload_with_retry};
use crate::backend::messaging::store::NewMessage;
use crate::backend::realtime::broadcast::push_to_user;
use crate::backend::server::state::AppState;
use crate::backend::social::gate::ensure_can_message;
use crate::shared::event::ServerEvent;
use crate::shared::message::{Message, MessageStatus, SendMessageRequest};

/// Send a message from `sender` to `receiver`
pub async fn send_message(
    state: &AppState,
    sender: Uuid,
    receiver: Uuid,
    request: SendMessageRequest,
) -> Result<Message, ApiError> {
    ensure_can_message(&state.graph, sender, receiver).await?;

    let text = request.text.filter(|t| !t.trim().is_empty());
    let image = request.image.filter(|i| !i.is_empty());
    if text.is_none() && image.is_none() {
        return Err(ApiError::validation(
            "Message must contain either text or image",
        ));
    }

    let image_url = match image {
        Some(payload) => {
            let bytes = decode_image_payload(&payload)?;
            Some(upload_with_retry(state.media.as_ref(), &bytes).await?)
        }
        None => None,
    };

    let message = state
        .messages
        .insert(NewMessage {
            sender_id: sender,
            receiver_id: receiver,
            text,
            image_url,
        })
        .await?;
    tracing::info!(message_id = %message.id, %sender, %receiver, "message persisted");

    push_to_user(
        &state.events,
        &state.presence,
        receiver,
        ServerEvent::NewMessage {
            message: message.clone(),
        },
    );

    Ok(message)
}

/// History between the caller and a peer, oldest first.
///
/// Gated by the same predicate as sending: the two endpoints never drift.
pub async fn get_messages(
    state: &AppState,
    user: Uuid,
    peer: Uuid,
) -> Result<Vec<Message>, ApiError> {
    ensure_can_message(&state.graph, user, peer).await?;
    Ok(state.messages.conversation(user, peer).await?)
}

/// Move one message's status forward and tell the sender.
///
/// Only `delivered` and `read` are acceptable inputs; a lower-or-equal
/// transition is a no-op, not an error, and emits no event.
pub async fn update_message_status(
    state: &AppState,
    message_id: Uuid,
    status: &str,
) -> Result<(), ApiError> {
    let status = match MessageStatus::from_str(status) {
        Some(status) if status != MessageStatus::Sent => status,
        _ => return Err(ApiError::validation("Invalid status")),
    };

    let message = state
        .messages
        .get(message_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    let updated = state
        .messages
        .set_status_if_higher(message_id, status)
        .await?;
    if !updated {
        return Ok(());
    }

    push_to_user(
        &state.events,
        &state.presence,
        message.sender_id,
        ServerEvent::MessageStatusUpdate { message_id, status },
    );
    Ok(())
}

/// Mark every message from `sender` to `receiver` read in one operation.
///
/// Exactly one `bulkReadStatusUpdate` event goes to the sender, however
/// many messages changed; per-message events here would storm the channel
/// on every chat open.
pub async fn mark_all_read(state: &AppState, receiver: Uuid, sender: Uuid) -> Result<u64, ApiError> {
    let updated = state.messages.mark_all_read(sender, receiver).await?;

    push_to_user(
        &state.events,
        &state.presence,
        sender,
        ServerEvent::BulkReadStatusUpdate { from: receiver },
    );
    Ok(updated)
}
