//! Shared Module
//!
//! This module contains the wire types exchanged between clients and the
//! server: user summaries, direct messages, follow-workflow DTOs, and the
//! real-time event enums carried over the WebSocket channel.
//!
//! Everything here is plain serde data. No persistence or transport logic
//! lives in this module.

/// User summaries and profile DTOs
pub mod user;

/// Direct message types and status lifecycle
pub mod message;

/// Follow-workflow request/response DTOs
pub mod follow;

/// Real-time event enums (client->server and server->client)
pub mod event;

/// Re-export commonly used types for convenience
pub use event::{ClientEvent, ServerEvent};
pub use follow::FollowCounts;
pub use message::{Message, MessageStatus};
pub use user::UserSummary;
