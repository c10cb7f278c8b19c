//! Middleware Module
//!
//! Request processing that runs before handlers.

/// Authenticated-identity extractor
pub mod auth;

pub use auth::AuthUser;
