//! Authentication Module
//!
//! Identity verification only. Tokens are issued by the external auth
//! service (signup, login, OTP verification all live there); this server
//! verifies the JWT it is handed and extracts the authenticated identity.

/// JWT claims and token verification
pub mod sessions;

pub use sessions::{create_token, verify_token, Claims};
