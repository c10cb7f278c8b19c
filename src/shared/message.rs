//! Direct Message Data Structures
//!
//! A message carries text, an image, or both, and walks a one-way status
//! lifecycle: sent -> delivered -> read. Status never moves backwards; a
//! request to set a lower-or-equal status is a no-op, not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery status of a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Persisted on the server, receiver has not seen it
    Sent,
    /// Receiver's client has received the message
    Delivered,
    /// Receiver has opened the conversation
    Read,
}

impl MessageStatus {
    /// Ordering rank used to enforce the one-way lifecycle
    pub fn priority(&self) -> u8 {
        match self {
            MessageStatus::Sent => 1,
            MessageStatus::Delivered => 2,
            MessageStatus::Read => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(MessageStatus::Sent),
            "delivered" => Some(MessageStatus::Delivered),
            "read" => Some(MessageStatus::Read),
            _ => None,
        }
    }
}

/// A direct message between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,
    /// Author of the message
    pub sender_id: Uuid,
    /// Recipient of the message
    pub receiver_id: Uuid,
    /// Text body; at least one of `text`/`image_url` is present
    pub text: Option<String>,
    /// URL of an attached image in the media store
    pub image_url: Option<String>,
    /// Current delivery status
    pub status: MessageStatus,
    /// When the message was persisted
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/messages/send/{receiver_id}`
///
/// `image` is an inline payload (raw base64 or a data URI); the server
/// resolves it to a URL through the media collaborator before persisting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub text: Option<String>,
    pub image: Option<String>,
}

/// Request body for `PATCH /api/messages/{id}/status`
///
/// The status arrives as a plain string so the pipeline can reject
/// anything outside {delivered, read} as a validation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `POST /api/messages/read`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadRequest {
    /// Peer whose messages to the caller should all become read
    pub sender_id: Uuid,
}

/// Response for `POST /api/messages/read`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub updated_count: u64,
}
