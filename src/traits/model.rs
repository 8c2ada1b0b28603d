//! Model trait shared by every resource type.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::FlarumClient;
use crate::document::{ApiResource, RelationshipData, Relationships, RequestDocument};
use crate::error::Result;
use crate::models::ModelData;
use crate::query::{Method, RequestOptions};
use crate::resources::wrap_one;

/// Permission flags exposed as `can*` boolean attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Reply,
    Rename,
    Edit,
    Delete,
    Hide,
    Tag,
}

impl Permission {
    /// The attribute carrying this permission.
    pub const fn attribute_key(self) -> &'static str {
        match self {
            Self::Reply => "canReply",
            Self::Rename => "canRename",
            Self::Edit => "canEdit",
            Self::Delete => "canDelete",
            Self::Hide => "canHide",
            Self::Tag => "canTag",
        }
    }
}

/// A typed wrapper around one JSON:API resource.
///
/// Implementors only provide the resource type, a constructor and access to
/// their [`ModelData`]; everything else is provided. Because `update` and
/// `refresh` return `Self`, calling them on a [`Discussion`](crate::Discussion)
/// yields a `Discussion`.
///
/// # Example
///
/// ```no_run
/// use flarumapi::{FlarumClient, Model};
/// use serde_json::json;
///
/// # async fn example(client: FlarumClient) -> flarumapi::Result<()> {
/// let discussion = client.discussions().get("1", &Default::default()).await?;
/// let renamed = discussion.update(&json!({"title": "New title"}), None).await?;
///
/// // The original instance is untouched.
/// assert_ne!(discussion.title(), renamed.title());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Model: Sized + Send + Sync {
    /// JSON:API resource type, also the collection endpoint.
    const TYPE: &'static str;

    /// Typed view of the attributes.
    type Attributes: DeserializeOwned;

    /// Build the model from a parsed resource. The resource is moved in, so
    /// the model is the sole owner of its attribute and relationship maps.
    fn from_resource(client: FlarumClient, resource: ApiResource) -> Self;

    /// Underlying resource data.
    fn data(&self) -> &ModelData;

    fn id(&self) -> &str {
        &self.data().id
    }

    fn resource_type(&self) -> &str {
        &self.data().resource_type
    }

    fn client(&self) -> &FlarumClient {
        &self.data().client
    }

    fn raw_attributes(&self) -> &Map<String, Value> {
        &self.data().attributes
    }

    fn relationships(&self) -> &Relationships {
        &self.data().relationships
    }

    fn attribute(&self, key: &str) -> Option<&Value> {
        self.data().attributes.get(key)
    }

    /// Deserialize the attributes into [`Model::Attributes`].
    fn attributes(&self) -> Result<Self::Attributes> {
        let value = Value::Object(self.raw_attributes().clone());
        Ok(serde_json::from_value(value)?)
    }

    /// Item endpoint, `<type>/<id>`.
    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.resource_type(),
            urlencoding::encode(self.id())
        )
    }

    /// Related ids for `name`, in order. Empty if the relation is absent.
    fn relationship_ids(&self, name: &str) -> Vec<String> {
        self.relationships()
            .get(name)
            .map(|r| r.identifiers().iter().map(|i| i.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Id of a to-one relation, `None` when unset or to-many.
    fn relationship_id(&self, name: &str) -> Option<&str> {
        match self.relationships().get(name)?.data.as_ref()? {
            RelationshipData::One(identifier) => Some(identifier.id.as_str()),
            RelationshipData::Many(_) => None,
        }
    }

    fn has_relationship(&self, name: &str) -> bool {
        self.relationships()
            .get(name)
            .is_some_and(|r| r.data.is_some())
    }

    /// Ids referenced by any relationship whose identifier type matches.
    fn related_ids(&self, resource_type: &str) -> Vec<String> {
        self.relationships()
            .values()
            .flat_map(|r| r.identifiers())
            .filter(|i| i.resource_type == resource_type)
            .map(|i| i.id.clone())
            .collect()
    }

    /// Whether the current actor holds `permission` on this resource.
    fn can(&self, permission: Permission) -> bool {
        self.attribute(permission.attribute_key())
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Parse an RFC 3339 attribute. `None` if missing or not a date string.
    fn date_attribute(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.attribute(key)?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.date_attribute("createdAt")
    }

    /// `updatedAt`, falling back to `editedAt`.
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.date_attribute("updatedAt")
            .or_else(|| self.date_attribute("editedAt"))
    }

    /// Send new attributes (and optionally relationships) and return the
    /// server's version as a new instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no data.
    async fn update<A>(&self, attributes: &A, relationships: Option<Relationships>) -> Result<Self>
    where
        A: Serialize + Sync,
    {
        let body = RequestDocument::new(
            self.resource_type(),
            Some(self.id()),
            attributes,
            relationships.as_ref(),
        )
        .to_value()?;
        let options = RequestOptions::new().method(Method::Patch).body(body);

        tracing::debug!(endpoint = %self.endpoint(), "updating resource");
        let document = self
            .client()
            .request_document(&self.endpoint(), &options)
            .await?;
        wrap_one(self.client(), document)
    }

    /// Delete the resource. Any response body is discarded.
    async fn delete(&self) -> Result<()> {
        let options = RequestOptions::new().method(Method::Delete);
        self.client().request(&self.endpoint(), &options).await?;
        Ok(())
    }

    /// Fetch the latest version as a new instance.
    async fn refresh(&self) -> Result<Self> {
        let document = self
            .client()
            .request_document(&self.endpoint(), &RequestOptions::new())
            .await?;
        wrap_one(self.client(), document)
    }
}
