//! Server Module
//!
//! Server initialization, application state, and configuration.

/// Configuration loading (database, media store)
pub mod config;

/// Application state
pub mod state;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::AppState;
