//! Flarum API client library.
//!
//! A Rust library for the JSON:API exposed by Flarum forums. Requests are
//! described with [`RequestOptions`] (includes, sparse fieldsets, filters,
//! sorting, pagination), responses are parsed into typed models, and each
//! model knows how to update, refresh and delete itself.
//!
//! # Quick Start
//!
//! ```no_run
//! use flarumapi::{ClientConfig, FlarumClient, Model, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> flarumapi::Result<()> {
//!     let client = FlarumClient::new("https://discuss.example.com", ClientConfig::default())?;
//!
//!     // Latest discussions with their authors
//!     let options = RequestOptions::new().include(["user"]).sort("-lastPostedAt").page(1);
//!     let discussions = client.discussions().get_all(&options).await?;
//!
//!     for discussion in &discussions {
//!         println!("{}: {:?}", discussion.id(), discussion.title());
//!     }
//!
//!     // Read the opening post of the first one
//!     if let Some(discussion) = discussions.first() {
//!         let post = discussion.first_post().await?;
//!         println!("{:?}", post.content());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`FlarumClient`] - base URL handling, token auth and the raw `request`
//! - [`Collection`] - `get`, `get_all` and `create` for one resource type
//! - [`Model`] - update, delete, refresh and relationship helpers shared by
//!   [`User`], [`Discussion`], [`Post`] and [`Tag`]
//!
//! # Configuration
//!
//! [`FlarumClient::from_env`] reads:
//!
//! - `FLARUM_URL` (required) - Forum URL; a bare host resolves to `<host>/api/`
//! - `FLARUM_API_TOKEN` (optional) - API token sent as `Authorization: Token <token>`

mod client;
mod document;
mod error;
mod models;
mod pagination;
mod query;
mod resources;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{ClientConfig, FlarumClient, IntoBaseUrl, TokenResponse};
pub use error::{FlarumError, Result};
pub use pagination::{Links, PageParams};
pub use query::{Method, RequestOptions};

// Re-export wire types
pub use document::{
    ApiResource, ApiResponse, PrimaryData, Relationship, RelationshipData, Relationships,
    ResourceIdentifier,
};

// Re-export traits
pub use traits::{Model, Permission};

// Re-export models
pub use models::{
    Discussion, DiscussionAttributes, DiscussionOptions, ModelData, Post, PostAttributes, Tag,
    TagAttributes, User, UserAttributes,
};

// Re-export collections
pub use resources::{wrap_many, wrap_one, Collection};
