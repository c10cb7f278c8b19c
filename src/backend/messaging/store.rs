/**
 * Message Store
 *
 * Append-only message persistence. The only mutation after insert is the
 * status column, and that only ever moves forward: the store-level
 * `set_status_if_higher` compares priorities inside the same atomic
 * operation that writes, so concurrent status updates cannot regress a
 * message even when they interleave.
 */

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::message::{Message, MessageStatus};

/// Fields for a message about to be persisted (status starts at `sent`)
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub text: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Error, Clone)]
pub enum MessageStoreError {
    #[error("message not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(String),
}

impl MessageStoreError {
    pub fn storage(err: impl ToString) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Message persistence boundary
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new message with status `sent`
    async fn insert(&self, new: NewMessage) -> Result<Message, MessageStoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Message>, MessageStoreError>;

    /// Move the message's status forward. Returns `false` (and changes
    /// nothing) when the requested status is not strictly higher than the
    /// current one; the comparison and the write are one atomic operation.
    async fn set_status_if_higher(
        &self,
        id: Uuid,
        status: MessageStatus,
    ) -> Result<bool, MessageStoreError>;

    /// Full history between two users, both directions, oldest first
    async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, MessageStoreError>;

    /// Transition every message from `sender` to `receiver` that is not yet
    /// read to `read`, in one persistence operation. Returns how many
    /// messages changed.
    async fn mark_all_read(&self, sender: Uuid, receiver: Uuid)
        -> Result<u64, MessageStoreError>;
}
