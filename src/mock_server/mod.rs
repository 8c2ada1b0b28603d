//! Mock Flarum API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Flarum
//! JSON:API for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server keeps state across
//! requests, so an update is visible to a later fetch.
//!
//! # Example
//!
//! ```ignore
//! use flarumapi::mock_server::MockServer;
//! use flarumapi::{ClientConfig, FlarumClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = FlarumClient::new(server.url(), ClientConfig::default()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let discussion = client.discussions().get("1", &Default::default()).await.unwrap();
//!     assert_eq!(discussion.title(), Some("Welcome"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::{create_router, MockServer};
pub use state::MockState;
