//! JSON:API document types.
//!
//! These mirror the wire format exactly and carry no behaviour beyond
//! small lookups. Typed models live in [`crate::models`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pagination::Links;

/// Relationships of a resource, keyed by relationship name.
pub type Relationships = BTreeMap<String, Relationship>;

/// A `{type, id}` pointer to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// Linkage data of a relationship: a single reference or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    Many(Vec<ResourceIdentifier>),
    One(ResourceIdentifier),
}

/// A named relationship. `data` is `None` when the relation is empty (`null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<RelationshipData>,
}

impl Relationship {
    /// A to-one relationship pointing at `resource_type/id`.
    pub fn to_one(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            data: Some(RelationshipData::One(ResourceIdentifier::new(
                resource_type,
                id,
            ))),
        }
    }

    /// A to-many relationship pointing at every id in `ids`.
    pub fn to_many<I, S>(resource_type: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identifiers = ids
            .into_iter()
            .map(|id| ResourceIdentifier::new(resource_type, id))
            .collect();
        Self {
            data: Some(RelationshipData::Many(identifiers)),
        }
    }

    /// An explicitly empty relationship (`"data": null`).
    pub fn empty() -> Self {
        Self { data: None }
    }

    /// Referenced identifiers in order. Empty when the relation is null.
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match &self.data {
            Some(RelationshipData::Many(items)) => items,
            Some(RelationshipData::One(item)) => std::slice::from_ref(item),
            None => &[],
        }
    }
}

/// A single JSON:API resource object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: Relationships,
}

/// Primary data of a response: one resource or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> PrimaryData<T> {
    /// All resources, a singular value becoming a one-element list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }

    /// The singular resource, or the first element of a list.
    pub fn into_first(self) -> Option<T> {
        match self {
            Self::Many(items) => items.into_iter().next(),
            Self::One(item) => Some(item),
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

/// A JSON:API response document.
///
/// `included` is parsed but never resolved into the primary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct ApiResponse<T = ApiResource> {
    pub data: PrimaryData<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ApiResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// Request document for create and update calls.
#[derive(Debug, Serialize)]
pub(crate) struct RequestDocument<'a, A: ?Sized> {
    pub data: RequestResource<'a, A>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestResource<'a, A: ?Sized> {
    #[serde(rename = "type")]
    pub resource_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub attributes: &'a A,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<&'a Relationships>,
}

impl<'a, A: Serialize + ?Sized> RequestDocument<'a, A> {
    /// Build a document; empty relationship maps are dropped.
    pub fn new(
        resource_type: &'a str,
        id: Option<&'a str>,
        attributes: &'a A,
        relationships: Option<&'a Relationships>,
    ) -> Self {
        Self {
            data: RequestResource {
                resource_type,
                id,
                attributes,
                relationships: relationships.filter(|r| !r.is_empty()),
            },
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_deserialize_with_relationships() {
        let resource: ApiResource = serde_json::from_value(json!({
            "type": "discussions",
            "id": "1",
            "attributes": {"title": "Hello"},
            "relationships": {
                "user": {"data": {"type": "users", "id": "2"}},
                "tags": {"data": [{"type": "tags", "id": "3"}, {"type": "tags", "id": "4"}]},
                "lastPost": {"data": null}
            }
        }))
        .unwrap();

        assert_eq!(resource.resource_type, "discussions");
        assert_eq!(resource.attributes["title"], "Hello");
        assert_eq!(resource.relationships["user"].identifiers()[0].id, "2");
        assert_eq!(resource.relationships["tags"].identifiers().len(), 2);
        assert!(resource.relationships["lastPost"].identifiers().is_empty());
    }

    #[test]
    fn test_resource_without_attributes_or_relationships() {
        let resource: ApiResource =
            serde_json::from_value(json!({"type": "groups", "id": "1"})).unwrap();
        assert!(resource.attributes.is_empty());
        assert!(resource.relationships.is_empty());
    }

    #[test]
    fn test_relationship_missing_data_is_empty() {
        let relationship: Relationship = serde_json::from_value(json!({
            "links": {"related": "https://forum.test/api/users/1"}
        }))
        .unwrap();
        assert!(relationship.data.is_none());
    }

    #[test]
    fn test_response_singular_and_list() {
        let one: ApiResponse = serde_json::from_value(json!({
            "data": {"type": "tags", "id": "1", "attributes": {}}
        }))
        .unwrap();
        assert!(!one.data.is_many());
        assert_eq!(one.data.into_vec().len(), 1);

        let many: ApiResponse = serde_json::from_value(json!({
            "data": [
                {"type": "tags", "id": "1", "attributes": {}},
                {"type": "tags", "id": "2", "attributes": {}}
            ],
            "included": [{"type": "users", "id": "9", "attributes": {}}],
            "links": {"next": "https://forum.test/api/tags?page%5Boffset%5D=2"},
            "meta": {"total": 2}
        }))
        .unwrap();
        assert!(many.data.is_many());
        assert_eq!(many.included.len(), 1);
        assert!(many.links.as_ref().is_some_and(Links::has_next));
        assert_eq!(many.data.into_first().map(|r| r.id), Some("1".to_string()));
    }

    #[test]
    fn test_request_document_drops_empty_relationships() {
        let attributes = json!({"title": "New"});
        let empty = Relationships::new();
        let doc = RequestDocument::new("discussions", Some("5"), &attributes, Some(&empty));

        assert_eq!(
            doc.to_value().unwrap(),
            json!({"data": {"type": "discussions", "id": "5", "attributes": {"title": "New"}}})
        );
    }

    #[test]
    fn test_request_document_with_relationship() {
        let attributes = json!({"content": "Hi"});
        let mut relationships = Relationships::new();
        relationships.insert(
            "discussion".to_string(),
            Relationship::to_one("discussions", "1"),
        );
        let doc = RequestDocument::new("posts", None, &attributes, Some(&relationships));

        assert_eq!(
            doc.to_value().unwrap(),
            json!({"data": {
                "type": "posts",
                "attributes": {"content": "Hi"},
                "relationships": {"discussion": {"data": {"type": "discussions", "id": "1"}}}
            }})
        );
    }
}
