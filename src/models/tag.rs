//! Tag model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::FlarumClient;
use crate::document::ApiResource;
use crate::error::Result;
use crate::models::{Discussion, ModelData};
use crate::query::RequestOptions;
use crate::resources::fetch_filtered;
use crate::traits::Model;

/// Attributes of a `tags` resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub background_url: Option<String>,
    #[serde(default)]
    pub background_mode: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub discussion_count: Option<u64>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub is_child: bool,
    #[serde(default)]
    pub is_hidden: bool,
}

/// A discussion tag.
#[derive(Debug, Clone)]
pub struct Tag {
    data: ModelData,
}

#[async_trait]
impl Model for Tag {
    const TYPE: &'static str = "tags";
    type Attributes = TagAttributes;

    fn from_resource(client: FlarumClient, resource: ApiResource) -> Self {
        Self {
            data: ModelData::new(client, resource),
        }
    }

    fn data(&self) -> &ModelData {
        &self.data
    }
}

impl Tag {
    pub fn name(&self) -> Option<&str> {
        self.data.str_attr("name")
    }

    pub fn slug(&self) -> Option<&str> {
        self.data.str_attr("slug")
    }

    pub fn description(&self) -> Option<&str> {
        self.data.str_attr("description")
    }

    pub fn color(&self) -> Option<&str> {
        self.data.str_attr("color")
    }

    pub fn discussion_count(&self) -> Option<u64> {
        self.data.u64_attr("discussionCount")
    }

    /// Parent tag id for child tags.
    pub fn parent_id(&self) -> Option<&str> {
        self.relationship_id("parent")
    }

    /// Discussions carrying this tag.
    #[tracing::instrument(skip(self, options), fields(tag = %self.id()))]
    pub async fn discussions(&self, options: &RequestOptions) -> Result<Vec<Discussion>> {
        fetch_filtered(self.client(), options, "tag", self.id()).await
    }
}
