//! User Data Structures
//!
//! DTOs describing users on the wire. The persisted user record (including
//! the credential hash) lives in the backend store layer and is never
//! serialized; these types are the only shapes clients see.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Compact user representation used in listings and notifications
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    /// Unique user ID
    pub id: Uuid,
    /// Unique handle
    pub username: String,
    /// Display name
    pub display_name: String,
    /// Profile picture URL, if one has been uploaded
    pub avatar_url: Option<String>,
}

/// Full profile returned by the user endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub email_verified: bool,
    /// Number of users following this user
    pub follower_count: u64,
    /// Number of users this user follows
    pub following_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Request body for `PUT /api/users/profile`
///
/// All fields are optional; absent fields are left untouched. `avatar` is an
/// inline image payload (optionally a data URI) that the server pushes
/// through the media collaborator before storing the resulting URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub avatar: Option<String>,
}
