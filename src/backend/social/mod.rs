//! Social Graph Module
//!
//! The follow/follower/follow-request state machine. Three layers:
//!
//! - **`store`** - persisted graph edges, with every mutation atomic with
//!   respect to the pair of user records it touches
//! - **`gate`** - the one shared `can_message` predicate
//! - **`workflow`** - orchestration: store mutation plus the real-time
//!   notification each operation owes the affected peer
//! - **`handlers`** - the HTTP surface over the workflow

/// Graph edge store trait and errors
pub mod store;

/// Messaging gate predicate
pub mod gate;

/// Follow workflow orchestration
pub mod workflow;

/// HTTP handlers for the follow endpoints
pub mod handlers;

pub use gate::ensure_can_message;
pub use store::{GraphError, GraphStore};
