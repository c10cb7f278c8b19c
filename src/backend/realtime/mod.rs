//! Real-time Update Module
//!
//! Server-to-client event fan-out over a single WebSocket connection per
//! active client, plus the broadcast plumbing the rest of the backend uses
//! to push events at identities.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports
//! ├── broadcast.rs - Event bus, targeted push, global broadcast
//! └── socket.rs    - WebSocket endpoint and connection lifecycle
//! ```
//!
//! # Delivery model
//!
//! Delivery is best-effort. Events ride a `tokio::sync::broadcast` channel;
//! each connection task forwards the envelopes addressed to everyone or to
//! its own identity. There is no acknowledgment, no queuing, and no
//! redelivery: an offline receiver simply misses the event and catches up
//! through the next history fetch.

/// Event bus and push helpers
pub mod broadcast;

/// WebSocket endpoint
pub mod socket;

pub use broadcast::{broadcast_all, push_to_user, Envelope, EventBus};
pub use socket::handle_socket_upgrade;
