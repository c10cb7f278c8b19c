//! perch - a social chat server
//!
//! Follow-gated direct messaging: a follow-request/accept/reject state
//! machine over a persisted social graph, a delivery pipeline with a
//! sent -> delivered -> read status lifecycle, and a WebSocket channel
//! keeping connected clients consistent with server-side state.
//!
//! The crate is split into [`shared`] (wire types used on both sides of
//! the HTTP/WebSocket boundary) and [`backend`] (the server).

/// Wire types shared between clients and the server
pub mod shared;

/// Server-side code
pub mod backend;
