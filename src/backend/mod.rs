//! Backend Module
//!
//! The server side of the application: an Axum HTTP server exposing the
//! follow workflow and message pipeline over REST, with a WebSocket
//! channel fanning server-side state changes out to connected clients.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - initialization, application state, configuration
//! - **`routes`** - router assembly and the API route table
//! - **`auth`** - JWT verification (token issuance is external)
//! - **`middleware`** - the `AuthUser` extractor
//! - **`users`** - user records, directory and profile endpoints
//! - **`social`** - the follow/request state machine and messaging gate
//! - **`messaging`** - the message store and delivery pipeline
//! - **`media`** - the external blob-store boundary with bounded retry
//! - **`presence`** - identity -> live connection registry
//! - **`realtime`** - event bus and the WebSocket endpoint
//! - **`store`** - Postgres and in-memory store implementations
//! - **`error`** - the boundary error taxonomy
//!
//! # State Management
//!
//! `AppState` holds the store handles, the media collaborator, the
//! presence registry, and the event bus. Stores are `Arc<dyn …>` traits so
//! the Postgres backing and the in-memory backing are interchangeable;
//! everything is cloned cheaply into handlers.
//!
//! # Real-time Fan-out
//!
//! Mutations push events at affected identities through a process-wide
//! broadcast channel; each WebSocket connection forwards the envelopes
//! addressed to it. Delivery is best-effort and never fails the mutation
//! that produced the event.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication (JWT verification)
pub mod auth;

/// Request middleware
pub mod middleware;

/// User records and endpoints
pub mod users;

/// Social graph: follow workflow and messaging gate
pub mod social;

/// Message store and delivery pipeline
pub mod messaging;

/// Media-store collaborator boundary
pub mod media;

/// Presence registry
pub mod presence;

/// Real-time event system
pub mod realtime;

/// Store implementations
pub mod store;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::ApiError;
pub use server::create_app;
pub use server::state::AppState;
