//! E2E tests using the mock Flarum server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use flarumapi::mock_server::{Fixtures, MockServer, MockState};
use flarumapi::{
    ClientConfig, DiscussionOptions, FlarumClient, FlarumError, Model, PageParams, RequestOptions,
};
use serde_json::json;

fn client(server: &MockServer) -> FlarumClient {
    FlarumClient::new(server.url(), ClientConfig::default()).unwrap()
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Authentication Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_login_then_access_protected_forum() {
    let state = Fixtures::default_scenario()
        .into_state()
        .with_required_token("static-token");
    let server = MockServer::with_state(state).await;
    let client = client(&server);

    // Step 1: Anonymous access is rejected
    let err = client
        .discussions()
        .get_all(&RequestOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));

    // Step 2: Log in with the fixture credentials
    let token = client.create_token("admin", "password").await.unwrap();
    assert_eq!(token.user_id.as_deref(), Some("1"));

    // Step 3: The stored token now authenticates requests
    let discussions = client
        .discussions()
        .get_all(&RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(discussions.len(), 2);

    server.shutdown().await;
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = client.create_token("admin", "nope").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(!client.has_token());

    server.shutdown().await;
}

#[tokio::test]
async fn test_static_token_from_config() {
    let state = MockState::new()
        .with_required_token("static-token")
        .with_resource(Fixtures::tag("1", "General"));
    let server = MockServer::with_state(state).await;

    let client =
        FlarumClient::new(server.url(), ClientConfig::with_token("static-token")).unwrap();
    let tag = client.tags().get("1", &RequestOptions::new()).await.unwrap();

    assert_eq!(tag.name(), Some("General"));

    server.shutdown().await;
}

// =============================================================================
// Discussion Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_browse_discussion_and_posts_workflow() {
    let server = MockServer::start().await;
    let client = client(&server);

    // Step 1: List discussions
    let discussions = client
        .discussions()
        .get_all(&RequestOptions::new())
        .await
        .unwrap();
    assert!(!discussions.is_empty(), "Expected at least one discussion");

    // Step 2: Read the first discussion's posts
    let welcome = &discussions[0];
    assert_eq!(welcome.title(), Some("Welcome"));

    let posts = welcome.posts(&RequestOptions::new()).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p.discussion_id() == Some("1")));

    // Step 3: The opening post
    let first = welcome.first_post().await.unwrap();
    assert_eq!(first.id(), "1");
    assert_eq!(first.content(), Some("Welcome to the forum!"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_start_discussion_and_reply_workflow() {
    let server = MockServer::start().await;
    let client = client(&server);
    client.create_token("admin", "password").await.unwrap();

    // Step 1: Start a tagged discussion
    let options = DiscussionOptions::new("Release notes", "Version 2 is out").with_tags(["1"]);
    let discussion = client.discussions().start(&options).await.unwrap();

    assert_eq!(discussion.id(), "3");
    assert_eq!(discussion.tag_ids(), vec!["1"]);
    assert_eq!(discussion.user_id(), Some("1"));

    // Step 2: Its content became the first post
    let first = discussion.first_post().await.unwrap();
    assert_eq!(first.content(), Some("Version 2 is out"));
    assert_eq!(first.user_id(), Some("1"));

    // Step 3: Reply
    let reply = discussion.create_post("Great news").await.unwrap();
    assert_eq!(reply.number(), Some(2));

    // Step 4: The tag now lists the new discussion
    let tag = client.tags().get("1", &RequestOptions::new()).await.unwrap();
    let tagged = tag.discussions(&RequestOptions::new()).await.unwrap();
    assert!(tagged.iter().any(|d| d.id() == discussion.id()));

    server.shutdown().await;
}

#[tokio::test]
async fn test_update_and_refresh_workflow() {
    let server = MockServer::start().await;
    let client = client(&server);

    // Step 1: Get original
    let original = client
        .discussions()
        .get("2", &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(original.title(), Some("Help needed"));

    // Step 2: Rename and lock
    let updated = original
        .update(&json!({"title": "Solved", "isLocked": true}), None)
        .await
        .unwrap();
    assert_eq!(updated.title(), Some("Solved"));
    assert!(updated.is_locked());

    // Step 3: The original instance is unchanged, a refresh sees the update
    assert_eq!(original.title(), Some("Help needed"));
    let refreshed = original.refresh().await.unwrap();
    assert_eq!(refreshed.title(), Some("Solved"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_delete_workflow() {
    let server = MockServer::start().await;
    let client = client(&server);

    let post = client.posts().get("2", &RequestOptions::new()).await.unwrap();
    post.delete().await.unwrap();

    let err = client
        .posts()
        .get("2", &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    server.shutdown().await;
}

#[tokio::test]
async fn test_first_post_missing() {
    let state = MockState::new().with_resource(Fixtures::minimal_discussion("1", "Empty"));
    let server = MockServer::with_state(state).await;
    let client = client(&server);

    let discussion = client
        .discussions()
        .get("1", &RequestOptions::new())
        .await
        .unwrap();
    let err = discussion.first_post().await.unwrap_err();

    assert!(matches!(err, FlarumError::NotFound(_)));

    server.shutdown().await;
}

// =============================================================================
// Query Tests
// =============================================================================

#[tokio::test]
async fn test_search_and_pagination() {
    let server = MockServer::start().await;
    let client = client(&server);

    let found = client
        .discussions()
        .get_all(&RequestOptions::new().filter("q", "help"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), "2");

    let page = RequestOptions::new().page(PageParams::number(2).with_limit(2));
    let posts = client.posts().get_all(&page).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id(), "3");

    server.shutdown().await;
}

#[tokio::test]
async fn test_user_relationships() {
    let server = MockServer::start().await;
    let client = client(&server);

    let admin = client.users().get("1", &RequestOptions::new()).await.unwrap();
    assert_eq!(admin.display_name(), Some("Administrator"));
    assert_eq!(admin.group_ids(), vec!["1"]);

    let jdoe = client.users().get("2", &RequestOptions::new()).await.unwrap();
    assert_eq!(jdoe.display_name(), Some("jdoe"));

    let posts = jdoe.posts(&RequestOptions::new()).await.unwrap();
    assert_eq!(posts.len(), 2);

    let discussions = jdoe.discussions(&RequestOptions::new()).await.unwrap();
    assert_eq!(discussions.len(), 1);
    assert_eq!(discussions[0].title(), Some("Help needed"));

    server.shutdown().await;
}

// =============================================================================
// State Manipulation Tests
// =============================================================================

#[tokio::test]
async fn test_state_changes_are_visible() {
    let server = MockServer::start_empty().await;
    let client = client(&server);

    assert!(client
        .tags()
        .get_all(&RequestOptions::new())
        .await
        .unwrap()
        .is_empty());

    server
        .state()
        .write()
        .await
        .insert(Fixtures::tag("4", "Announcements"));

    let tags = client.tags().get_all(&RequestOptions::new()).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name(), Some("Announcements"));

    server.shutdown().await;
}
