/**
 * Follow Workflow
 *
 * Orchestration over the graph store: each operation performs its atomic
 * graph mutation, then notifies the affected peer over the real-time
 * channel. Notifications are best-effort and never fail the operation;
 * the graph mutation's outcome is the only thing the caller observes.
 */

use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::realtime::broadcast::{broadcast_all, push_to_user};
use crate::backend::server::state::AppState;
use crate::shared::event::ServerEvent;
use crate::shared::follow::FollowCounts;
use crate::shared::user::UserSummary;

async fn summary_of(state: &AppState, id: Uuid) -> Result<UserSummary, ApiError> {
    let record = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(record.summary())
}

/// Record `from`'s intent to follow `to` and notify `to` if online.
///
/// Returns the target's summary for the response body.
pub async fn send_request(state: &AppState, from: Uuid, to: Uuid) -> Result<UserSummary, ApiError> {
    state.graph.send_follow_request(from, to).await?;
    tracing::info!(%from, %to, "follow request sent");

    push_to_user(
        &state.events,
        &state.presence,
        to,
        ServerEvent::NewFollowRequest { from },
    );
    summary_of(state, to).await
}

/// Accept `requester`'s pending request and notify the requester.
///
/// Acceptance gives `user` a follower; it does not make the follow mutual.
/// Returns the new follower's summary.
pub async fn accept_request(
    state: &AppState,
    user: Uuid,
    requester: Uuid,
) -> Result<UserSummary, ApiError> {
    state.graph.accept_follow_request(user, requester).await?;
    tracing::info!(%user, %requester, "follow request accepted");

    push_to_user(
        &state.events,
        &state.presence,
        requester,
        ServerEvent::RequestAccepted { by: user },
    );
    summary_of(state, requester).await
}

/// Drop `requester`'s pending request and notify the requester.
pub async fn reject_request(state: &AppState, user: Uuid, requester: Uuid) -> Result<(), ApiError> {
    state.graph.reject_follow_request(user, requester).await?;
    tracing::info!(%user, %requester, "follow request rejected");

    push_to_user(
        &state.events,
        &state.presence,
        requester,
        ServerEvent::RequestRejected { by: user },
    );
    Ok(())
}

/// Direct, request-less follow. Notifies the target and returns the
/// caller's updated counts.
pub async fn follow_user(
    state: &AppState,
    user: Uuid,
    target: Uuid,
) -> Result<FollowCounts, ApiError> {
    state.graph.follow(user, target).await?;
    tracing::info!(%user, %target, "follow edge created");

    push_to_user(
        &state.events,
        &state.presence,
        target,
        ServerEvent::NewFollower { follower_id: user },
    );
    Ok(state.graph.counts(user).await?)
}

/// Remove the follow edge and broadcast the removal to every connection:
/// any client may have the pair's chat open and must invalidate it.
pub async fn unfollow_user(
    state: &AppState,
    user: Uuid,
    target: Uuid,
) -> Result<FollowCounts, ApiError> {
    state.graph.unfollow(user, target).await?;
    tracing::info!(%user, %target, "follow edge removed");

    broadcast_all(
        &state.events,
        ServerEvent::Unfollowed {
            unfollower_id: user,
            unfollowed_id: target,
        },
    );
    Ok(state.graph.counts(user).await?)
}
