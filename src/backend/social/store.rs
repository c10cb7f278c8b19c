/**
 * Social Graph Store
 *
 * Follow edges and pending follow requests. A follow edge is directional
 * (`follower -> followee`); a mutual follow is two edges. Requests are
 * unilateral intents stored against the target until accepted or rejected.
 *
 * # Atomicity
 *
 * Each operation is atomic with respect to the user records it touches:
 * the Postgres implementation wraps every multi-statement mutation in a
 * transaction, the in-memory implementation serializes all graph access
 * behind one write lock. Duplicate requests are rejected outright, never
 * silently deduplicated, and accepting a request twice is an error.
 */

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::follow::FollowCounts;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Operation targets the acting user itself
    #[error("operation cannot target the acting user")]
    SelfReference,
    /// One of the two users does not exist
    #[error("user not found")]
    UserNotFound,
    /// Follow edge already present
    #[error("already following")]
    AlreadyFollowing,
    /// Follow edge absent where one is required
    #[error("not following")]
    NotFollowing,
    /// A request between this pair is already pending
    #[error("follow request already pending")]
    DuplicateRequest,
    /// No pending request where one is required
    #[error("no such follow request")]
    NoSuchRequest,
    #[error("storage failure: {0}")]
    Storage(String),
}

impl GraphError {
    pub fn storage(err: impl ToString) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Graph edge persistence boundary
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Record `from`'s intent to follow `to`.
    ///
    /// Fails with `SelfReference`, `UserNotFound`, `AlreadyFollowing`
    /// (edge `from -> to` already exists), or `DuplicateRequest` (a
    /// request from `from` is already pending on `to`).
    async fn send_follow_request(&self, from: Uuid, to: Uuid) -> Result<(), GraphError>;

    /// Accept `requester`'s pending request on `user`: the request is
    /// removed and the edge `requester -> user` is created, all in one
    /// mutation. Acceptance does NOT reciprocate; mutuality requires a
    /// separate follow in the other direction.
    async fn accept_follow_request(&self, user: Uuid, requester: Uuid) -> Result<(), GraphError>;

    /// Remove `requester`'s pending request on `user` without creating an
    /// edge.
    async fn reject_follow_request(&self, user: Uuid, requester: Uuid) -> Result<(), GraphError>;

    /// Create the edge `user -> target` directly (request-less path).
    /// Clears any request `user` had pending on `target`, keeping the
    /// request/following exclusivity invariant.
    async fn follow(&self, user: Uuid, target: Uuid) -> Result<(), GraphError>;

    /// Remove the edge `user -> target`. Fails with `NotFollowing` when
    /// the edge is absent.
    async fn unfollow(&self, user: Uuid, target: Uuid) -> Result<(), GraphError>;

    /// IDs of users following `user`
    async fn followers_of(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError>;

    /// IDs of users `user` follows
    async fn following_of(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError>;

    /// IDs with a request pending on `user`, oldest first
    async fn pending_requests(&self, user: Uuid) -> Result<Vec<Uuid>, GraphError>;

    /// Whether both edges `a -> b` and `b -> a` exist. Always computed
    /// fresh from the stored edges, never from anything cached.
    async fn is_mutual_follow(&self, a: Uuid, b: Uuid) -> Result<bool, GraphError>;

    /// Follower/following totals for one user
    async fn counts(&self, user: Uuid) -> Result<FollowCounts, GraphError>;
}
