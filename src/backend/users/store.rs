/**
 * User Records and Store Boundary
 *
 * `UserRecord` is the persisted shape. Graph edges (followers, following,
 * pending requests) conceptually live on the user record; they are managed
 * through the social graph store and joined back in when building profile
 * responses.
 */

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::follow::FollowCounts;
use crate::shared::user::{UserProfile, UserSummary};

/// Persisted user record
///
/// Deliberately not `Serialize`: responses go through `summary()` /
/// `profile()`, which never expose the credential hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    /// Unique handle
    pub username: String,
    pub display_name: String,
    pub email: String,
    /// Opaque hash written by the auth service
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }

    pub fn profile(&self, counts: FollowCounts) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            bio: self.bio.clone(),
            birthday: self.birthday,
            email_verified: self.email_verified,
            follower_count: counts.followers,
            following_count: counts.following,
            created_at: self.created_at,
        }
    }
}

/// Fields for a new user record (written on signup by the auth service)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Error, Clone)]
pub enum UserStoreError {
    #[error("user not found")]
    NotFound,
    #[error("username already taken")]
    HandleTaken,
    #[error("storage failure: {0}")]
    Storage(String),
}

impl UserStoreError {
    pub fn storage(err: impl ToString) -> Self {
        Self::Storage(err.to_string())
    }
}

/// User persistence boundary
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, UserStoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<UserRecord>, UserStoreError>;

    /// Directory listing: everyone except `id`, ordered by handle
    async fn list_except(&self, id: Uuid) -> Result<Vec<UserRecord>, UserStoreError>;

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UserStoreError>;

    /// Delete the record and cascade the identity out of every other
    /// user's graph state. Messages are retained.
    async fn delete(&self, id: Uuid) -> Result<(), UserStoreError>;
}
