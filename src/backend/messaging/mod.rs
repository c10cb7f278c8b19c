//! Messaging Module
//!
//! Direct messages between mutually-following users: the message store,
//! the delivery pipeline (gate check, media resolution, persistence,
//! real-time push, status lifecycle), and the HTTP handlers.

/// Message persistence boundary
pub mod store;

/// Delivery pipeline orchestration
pub mod pipeline;

/// HTTP handlers for the message endpoints
pub mod handlers;

pub use store::{MessageStore, MessageStoreError, NewMessage};
