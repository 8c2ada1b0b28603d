//! Discussion model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::FlarumClient;
use crate::document::{ApiResource, Relationship, Relationships, RequestDocument};
use crate::error::{FlarumError, Result};
use crate::models::{ModelData, Post};
use crate::query::{Method, RequestOptions};
use crate::resources::{fetch_filtered, wrap_one};
use crate::traits::Model;

/// Attributes of a `discussions` resource.
///
/// Every field is optional so sparse fieldsets still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionAttributes {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub participant_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_post_number: Option<u64>,
    #[serde(default)]
    pub can_reply: bool,
    #[serde(default)]
    pub can_rename: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_sticky: bool,
    #[serde(default)]
    pub is_private: Option<bool>,
}

/// Input for [`Collection::start`](crate::Collection::start).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscussionOptions {
    pub title: String,
    /// Content of the first post.
    pub content: String,
    /// Tag ids to attach.
    pub tags: Vec<String>,
}

impl DiscussionOptions {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// A forum discussion.
#[derive(Debug, Clone)]
pub struct Discussion {
    data: ModelData,
}

#[async_trait]
impl Model for Discussion {
    const TYPE: &'static str = "discussions";
    type Attributes = DiscussionAttributes;

    fn from_resource(client: FlarumClient, resource: ApiResource) -> Self {
        Self {
            data: ModelData::new(client, resource),
        }
    }

    fn data(&self) -> &ModelData {
        &self.data
    }
}

impl Discussion {
    pub fn title(&self) -> Option<&str> {
        self.data.str_attr("title")
    }

    pub fn slug(&self) -> Option<&str> {
        self.data.str_attr("slug")
    }

    pub fn comment_count(&self) -> Option<u64> {
        self.data.u64_attr("commentCount")
    }

    pub fn is_locked(&self) -> bool {
        self.data.bool_attr("isLocked")
    }

    pub fn is_sticky(&self) -> bool {
        self.data.bool_attr("isSticky")
    }

    pub fn last_posted_at(&self) -> Option<DateTime<Utc>> {
        self.date_attribute("lastPostedAt")
    }

    /// Id of the author.
    pub fn user_id(&self) -> Option<&str> {
        self.relationship_id("user")
    }

    pub fn tag_ids(&self) -> Vec<String> {
        self.relationship_ids("tags")
    }

    /// Reply to this discussion.
    #[tracing::instrument(skip(self, content), fields(discussion = %self.id()))]
    pub async fn create_post(&self, content: &str) -> Result<Post> {
        let attributes = serde_json::json!({ "content": content });
        let mut relationships = Relationships::new();
        relationships.insert(
            "discussion".to_string(),
            Relationship::to_one(Self::TYPE, self.id()),
        );

        let body = RequestDocument::new(Post::TYPE, None, &attributes, Some(&relationships))
            .to_value()?;
        let options = RequestOptions::new().method(Method::Post).body(body);

        let document = self.client().request_document(Post::TYPE, &options).await?;
        wrap_one(self.client(), document)
    }

    /// Posts in this discussion. Caller filters are kept, except that
    /// `discussion` always points at this discussion.
    #[tracing::instrument(skip(self, options), fields(discussion = %self.id()))]
    pub async fn posts(&self, options: &RequestOptions) -> Result<Vec<Post>> {
        fetch_filtered(self.client(), options, "discussion", self.id()).await
    }

    /// The opening post.
    ///
    /// # Errors
    ///
    /// Returns [`FlarumError::NotFound`] if no post numbered 1 is returned.
    pub async fn first_post(&self) -> Result<Post> {
        let options = RequestOptions::new().filter("number", 1);
        self.posts(&options)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FlarumError::NotFound("First post not found".to_string()))
    }
}
