//! Users Module
//!
//! Persisted user records and the profile/directory endpoints. The record
//! type carries the credential hash written by the external auth service;
//! it never leaves the store layer unserialized.

/// User record types and the store trait
pub mod store;

/// HTTP handlers for the user endpoints
pub mod handlers;

pub use store::{NewUser, ProfileUpdate, UserRecord, UserStore, UserStoreError};
