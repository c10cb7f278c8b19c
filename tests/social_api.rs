//! Follow workflow integration tests
//!
//! Exercises the request/accept/reject/follow/unfollow state machine over
//! the HTTP surface against in-memory state.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use common::{bearer, create_test_user, spawn_app};
use perch::shared::follow::{FollowCounts, PendingRequestsResponse};
use perch::shared::user::UserSummary;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_follow_request_lands_on_target() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;
    let bob = create_test_user(&app.state, "bob").await;

    let response = app
        .server
        .post(&format!("/api/users/follow-request/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await;
    response.assert_status(StatusCode::OK);

    let receiver: UserSummary = response.json();
    assert_eq!(receiver.id, bob.id);

    let requests: PendingRequestsResponse = app
        .server
        .get("/api/users/requests")
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .json();
    assert_eq!(requests.requests.len(), 1);
    assert_eq!(requests.requests[0].id, alice.id);
}

#[tokio::test]
async fn test_duplicate_follow_request_is_a_conflict() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;
    let bob = create_test_user(&app.state, "bob").await;

    app.server
        .post(&format!("/api/users/follow-request/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::OK);

    let response = app
        .server
        .post(&format!("/api/users/follow-request/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn test_self_follow_request_is_rejected() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;

    app.server
        .post(&format!("/api/users/follow-request/{}", alice.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_to_unknown_user_is_not_found() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;

    app.server
        .post(&format!("/api/users/follow-request/{}", uuid::Uuid::new_v4()))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_accept_creates_asymmetric_edge_only() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;
    let bob = create_test_user(&app.state, "bob").await;

    app.server
        .post(&format!("/api/users/follow-request/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::OK);

    let response = app
        .server
        .post(&format!("/api/users/accept-request/{}", alice.id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await;
    response.assert_status(StatusCode::OK);
    let follower: UserSummary = response.json();
    assert_eq!(follower.id, alice.id);

    // Alice now follows Bob; Bob does not follow Alice back
    let bob_followers: Vec<UserSummary> = app
        .server
        .get(&format!("/api/users/{}/followers", bob.id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .json();
    assert_eq!(bob_followers.len(), 1);
    assert_eq!(bob_followers[0].id, alice.id);

    let alice_followers: Vec<UserSummary> = app
        .server
        .get(&format!("/api/users/{}/followers", alice.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .json();
    assert!(alice_followers.is_empty());

    assert!(!app.state.graph.is_mutual_follow(alice.id, bob.id).await.unwrap());
}

#[tokio::test]
async fn test_accepting_twice_is_an_error() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;
    let bob = create_test_user(&app.state, "bob").await;

    app.server
        .post(&format!("/api/users/follow-request/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::OK);
    app.server
        .post(&format!("/api/users/accept-request/{}", alice.id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .assert_status(StatusCode::OK);

    // Not idempotent by design: the request is gone
    app.server
        .post(&format!("/api/users/accept-request/{}", alice.id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reject_clears_request_without_creating_edge() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;
    let bob = create_test_user(&app.state, "bob").await;

    app.server
        .post(&format!("/api/users/follow-request/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::OK);
    app.server
        .post(&format!("/api/users/reject-request/{}", alice.id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .assert_status(StatusCode::OK);

    let requests: PendingRequestsResponse = app
        .server
        .get("/api/users/requests")
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .json();
    assert!(requests.requests.is_empty());

    let bob_followers: Vec<UserSummary> = app
        .server
        .get(&format!("/api/users/{}/followers", bob.id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .json();
    assert!(bob_followers.is_empty());

    // Rejecting again: the request no longer exists
    app.server
        .post(&format!("/api/users/reject-request/{}", alice.id))
        .add_header(AUTHORIZATION, bearer(&bob))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_follow_unfollow_roundtrip_restores_counts() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;
    let bob = create_test_user(&app.state, "bob").await;

    let response = app
        .server
        .post(&format!("/api/users/follow/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await;
    response.assert_status(StatusCode::OK);
    let counts: FollowCounts = response.json();
    assert_eq!(counts.following, 1);

    let response = app
        .server
        .post(&format!("/api/users/unfollow/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await;
    response.assert_status(StatusCode::OK);
    let counts: FollowCounts = response.json();
    assert_eq!(counts, FollowCounts::default());

    // Unfollowing again is a state conflict
    app.server
        .post(&format!("/api/users/unfollow/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_double_follow_is_a_conflict() {
    let app = spawn_app();
    let alice = create_test_user(&app.state, "alice").await;
    let bob = create_test_user(&app.state, "bob").await;

    app.server
        .post(&format!("/api/users/follow/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::OK);
    app.server
        .post(&format!("/api/users/follow/{}", bob.id))
        .add_header(AUTHORIZATION, bearer(&alice))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_endpoints_require_authentication() {
    let app = spawn_app();

    app.server
        .get("/api/users")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .post(&format!("/api/users/follow/{}", uuid::Uuid::new_v4()))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
