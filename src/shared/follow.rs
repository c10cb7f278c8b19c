//! Follow Workflow DTOs

use serde::{Deserialize, Serialize};

use crate::shared::user::UserSummary;

/// Follower/following totals returned by the follow and unfollow endpoints
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowCounts {
    pub followers: u64,
    pub following: u64,
}

/// Response for `GET /api/users/requests`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequestsResponse {
    /// Users with an inbound request pending on the caller's record
    pub requests: Vec<UserSummary>,
}
