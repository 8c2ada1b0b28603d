//! User model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::FlarumClient;
use crate::document::ApiResource;
use crate::error::Result;
use crate::models::{Discussion, ModelData, Post};
use crate::query::RequestOptions;
use crate::resources::fetch_filtered;
use crate::traits::Model;

/// Attributes of a `users` resource.
///
/// `email` and `isEmailConfirmed` are only present for actors allowed to
/// see them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_email_confirmed: Option<bool>,
    #[serde(default)]
    pub join_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discussion_count: Option<u64>,
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

/// A forum user.
#[derive(Debug, Clone)]
pub struct User {
    data: ModelData,
}

#[async_trait]
impl Model for User {
    const TYPE: &'static str = "users";
    type Attributes = UserAttributes;

    fn from_resource(client: FlarumClient, resource: ApiResource) -> Self {
        Self {
            data: ModelData::new(client, resource),
        }
    }

    fn data(&self) -> &ModelData {
        &self.data
    }
}

impl User {
    pub fn username(&self) -> Option<&str> {
        self.data.str_attr("username")
    }

    /// Display name, or the username when none is set.
    pub fn display_name(&self) -> Option<&str> {
        self.data
            .str_attr("displayName")
            .filter(|name| !name.is_empty())
            .or_else(|| self.username())
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.data
            .str_attr("avatarUrl")
            .filter(|url| !url.is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.data.str_attr("email")
    }

    pub fn joined_at(&self) -> Option<DateTime<Utc>> {
        self.date_attribute("joinTime")
    }

    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        self.date_attribute("lastSeenAt")
    }

    pub fn group_ids(&self) -> Vec<String> {
        self.relationship_ids("groups")
    }

    /// Discussions started by this user.
    #[tracing::instrument(skip(self, options), fields(user = %self.id()))]
    pub async fn discussions(&self, options: &RequestOptions) -> Result<Vec<Discussion>> {
        fetch_filtered(self.client(), options, "user", self.id()).await
    }

    /// Posts written by this user.
    #[tracing::instrument(skip(self, options), fields(user = %self.id()))]
    pub async fn posts(&self, options: &RequestOptions) -> Result<Vec<Post>> {
        fetch_filtered(self.client(), options, "user", self.id()).await
    }
}
