//! Backend Error Module
//!
//! Boundary error taxonomy for the HTTP surface. Domain errors from the
//! store, gate, pipeline, and media layers are converted into `ApiError`,
//! which maps onto an HTTP status code and a short machine-readable body.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - ApiError definition and constructors
//! └── conversion.rs - From<domain error> and IntoResponse impls
//! ```
//!
//! # Taxonomy
//!
//! - `Validation` - malformed input (400)
//! - `Permission` - unauthenticated (401) or not permitted (403)
//! - `NotFound` - missing user or message (404)
//! - `Conflict` - duplicate request, already/not following, self-reference (400)
//! - `Dependency` - media collaborator failure after retries (500)
//! - `Internal` - unexpected persistence failure (500)
//!
//! Internal errors never leak their cause to the client; the detail goes to
//! the log and the response body carries a generic message.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::ApiError;
