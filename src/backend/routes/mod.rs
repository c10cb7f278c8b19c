//! Route Configuration
//!
//! Router assembly for the REST surface and the WebSocket endpoint.

/// Main router creation
pub mod router;

/// API route table
pub mod api_routes;

pub use router::create_router;
