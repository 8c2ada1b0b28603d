//! Post model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::FlarumClient;
use crate::document::ApiResource;
use crate::models::ModelData;
use crate::traits::Model;

/// Attributes of a `posts` resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAttributes {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_hide: bool,
    #[serde(default)]
    pub is_hidden: bool,
}

/// A post within a discussion.
#[derive(Debug, Clone)]
pub struct Post {
    data: ModelData,
}

#[async_trait]
impl Model for Post {
    const TYPE: &'static str = "posts";
    type Attributes = PostAttributes;

    fn from_resource(client: FlarumClient, resource: ApiResource) -> Self {
        Self {
            data: ModelData::new(client, resource),
        }
    }

    fn data(&self) -> &ModelData {
        &self.data
    }
}

impl Post {
    /// Position within the discussion, starting at 1.
    pub fn number(&self) -> Option<u64> {
        self.data.u64_attr("number")
    }

    pub fn content(&self) -> Option<&str> {
        self.data.str_attr("content")
    }

    pub fn content_html(&self) -> Option<&str> {
        self.data.str_attr("contentHtml")
    }

    pub fn is_hidden(&self) -> bool {
        self.data.bool_attr("isHidden")
    }

    pub fn edited_at(&self) -> Option<DateTime<Utc>> {
        self.date_attribute("editedAt")
    }

    pub fn discussion_id(&self) -> Option<&str> {
        self.relationship_id("discussion")
    }

    /// Id of the author.
    pub fn user_id(&self) -> Option<&str> {
        self.relationship_id("user")
    }

    pub fn is_first_post(&self) -> bool {
        self.number() == Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::model;
    use crate::traits::Permission;
    use serde_json::json;

    #[test]
    fn test_first_post() {
        let post: Post = model(json!({
            "type": "posts",
            "id": "10",
            "attributes": {
                "number": 1,
                "content": "Hello",
                "contentHtml": "<p>Hello</p>",
                "createdAt": "2024-01-02T03:04:05+00:00",
                "editedAt": "2024-02-01T00:00:00+00:00",
                "canEdit": true
            },
            "relationships": {
                "discussion": {"data": {"type": "discussions", "id": "1"}},
                "user": {"data": {"type": "users", "id": "2"}}
            }
        }));

        assert!(post.is_first_post());
        assert_eq!(post.content(), Some("Hello"));
        assert_eq!(post.content_html(), Some("<p>Hello</p>"));
        assert_eq!(post.discussion_id(), Some("1"));
        assert_eq!(post.user_id(), Some("2"));
        assert!(post.can(Permission::Edit));
        assert!(!post.can(Permission::Hide));
        // updatedAt is absent, so editedAt is used
        assert_eq!(post.updated_at(), post.edited_at());
        assert!(post.updated_at().is_some());
    }

    #[test]
    fn test_reply_without_user() {
        let post: Post = model(json!({
            "type": "posts",
            "id": "11",
            "attributes": {"number": 2, "editedAt": null, "createdAt": 12345},
            "relationships": {"user": {"data": null}}
        }));

        assert!(!post.is_first_post());
        assert!(post.user_id().is_none());
        assert!(post.discussion_id().is_none());
        assert!(post.updated_at().is_none());
        assert!(post.created_at().is_none());
    }

    #[test]
    fn test_invalid_date_string_is_absent() {
        let post: Post = model(json!({
            "type": "posts",
            "id": "12",
            "attributes": {"createdAt": "yesterday"}
        }));
        assert!(post.created_at().is_none());
    }

    #[test]
    fn test_typed_attributes() {
        let post: Post = model(json!({
            "type": "posts",
            "id": "13",
            "attributes": {"number": 4, "isHidden": true}
        }));
        let attributes = post.attributes().unwrap();
        assert_eq!(attributes.number, Some(4));
        assert!(attributes.is_hidden);
        assert!(attributes.content.is_none());
    }
}
