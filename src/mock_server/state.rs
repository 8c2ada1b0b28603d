//! Mock server state management.
//!
//! Provides the in-memory resource store for the mock Flarum API server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{ApiResource, Relationship, Relationships};

/// Resource types the mock server knows about.
pub const RESOURCE_TYPES: [&str; 4] = ["users", "discussions", "posts", "tags"];

/// Shared state for the mock server.
///
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Resources by type, then by id.
    pub resources: HashMap<String, BTreeMap<u64, ApiResource>>,

    /// Login credentials: identification -> (password, user id).
    pub credentials: HashMap<String, (String, String)>,

    /// Tokens handed out by the `token` endpoint, mapped to user ids.
    pub issued_tokens: HashMap<String, String>,

    /// Optional token that is always accepted. If set, every request other
    /// than `token` must be authenticated.
    pub required_token: Option<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            resources: RESOURCE_TYPES
                .iter()
                .map(|t| (t.to_string(), BTreeMap::new()))
                .collect(),
            credentials: HashMap::new(),
            issued_tokens: HashMap::new(),
            required_token: None,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a resource. Ids must be numeric, as they are in Flarum.
    pub fn with_resource(mut self, resource: ApiResource) -> Self {
        self.insert(resource);
        self
    }

    /// Register login credentials for a user.
    pub fn with_credentials(
        mut self,
        identification: &str,
        password: &str,
        user_id: &str,
    ) -> Self {
        self.credentials.insert(
            identification.to_string(),
            (password.to_string(), user_id.to_string()),
        );
        self
    }

    /// Require authentication, always accepting `token`.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Whether `resource_type` is served.
    pub fn has_type(&self, resource_type: &str) -> bool {
        self.resources.contains_key(resource_type)
    }

    /// Check an `Authorization` header value.
    pub fn is_authorized(&self, authorization: Option<&str>) -> bool {
        let Some(required) = &self.required_token else {
            return true;
        };

        match authorization.and_then(|h| h.strip_prefix("Token ")) {
            Some(token) => token == required || self.issued_tokens.contains_key(token),
            None => false,
        }
    }

    /// Exchange credentials for a fresh token.
    pub fn issue_token(
        &mut self,
        identification: &str,
        password: &str,
    ) -> Option<(String, String)> {
        let (expected, user_id) = self.credentials.get(identification)?;
        if expected != password {
            return None;
        }

        let user_id = user_id.clone();
        let token = format!("mock-token-{}-{}", user_id, self.issued_tokens.len() + 1);
        self.issued_tokens.insert(token.clone(), user_id.clone());
        Some((token, user_id))
    }

    /// User id behind an issued token, if any.
    pub fn actor_id(&self, authorization: Option<&str>) -> Option<String> {
        let token = authorization?.strip_prefix("Token ")?;
        self.issued_tokens.get(token).cloned()
    }

    /// Get a resource by type and id.
    pub fn get(&self, resource_type: &str, id: &str) -> Option<&ApiResource> {
        let id: u64 = id.parse().ok()?;
        self.resources.get(resource_type)?.get(&id)
    }

    /// List resources of a type matching every `(key, value)` filter.
    pub fn list(&self, resource_type: &str, filters: &[(String, String)]) -> Vec<&ApiResource> {
        self.resources
            .get(resource_type)
            .map(|items| {
                items
                    .values()
                    .filter(|r| filters.iter().all(|(k, v)| matches_filter(r, k, v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Store a resource, replacing any with the same type and id.
    pub fn insert(&mut self, resource: ApiResource) {
        let id = resource
            .id
            .parse()
            .expect("mock resources must have numeric ids");
        self.resources
            .entry(resource.resource_type.clone())
            .or_default()
            .insert(id, resource);
    }

    /// Create a resource with the next free id.
    pub fn create(
        &mut self,
        resource_type: &str,
        attributes: Map<String, Value>,
        relationships: Relationships,
    ) -> ApiResource {
        let next_id = self
            .resources
            .get(resource_type)
            .and_then(|items| items.keys().next_back())
            .map_or(1, |id| id + 1);

        let resource = ApiResource {
            resource_type: resource_type.to_string(),
            id: next_id.to_string(),
            attributes,
            relationships,
        };
        self.insert(resource.clone());
        resource
    }

    /// Merge attributes and relationships into an existing resource.
    pub fn update(
        &mut self,
        resource_type: &str,
        id: &str,
        attributes: Map<String, Value>,
        relationships: Relationships,
    ) -> Option<&ApiResource> {
        let id: u64 = id.parse().ok()?;
        let resource = self.resources.get_mut(resource_type)?.get_mut(&id)?;

        resource.attributes.extend(attributes);
        resource.relationships.extend(relationships);
        Some(&*resource)
    }

    /// Remove a resource. Returns whether it existed.
    pub fn delete(&mut self, resource_type: &str, id: &str) -> bool {
        let Ok(id) = id.parse::<u64>() else {
            return false;
        };
        self.resources
            .get_mut(resource_type)
            .and_then(|items| items.remove(&id))
            .is_some()
    }

    /// Create a post at the end of a discussion.
    pub fn create_post(
        &mut self,
        discussion_id: &str,
        content: &str,
        user_id: Option<&str>,
    ) -> ApiResource {
        let in_discussion = [("discussion".to_string(), discussion_id.to_string())];
        let number = self.list("posts", &in_discussion).len() + 1;

        let mut attributes = Map::new();
        attributes.insert("number".to_string(), Value::from(number));
        attributes.insert("content".to_string(), Value::from(content));
        attributes.insert(
            "contentHtml".to_string(),
            Value::from(format!("<p>{content}</p>")),
        );

        let mut relationships = Relationships::new();
        relationships.insert(
            "discussion".to_string(),
            Relationship::to_one("discussions", discussion_id),
        );
        relationships.insert(
            "user".to_string(),
            user_id.map_or_else(Relationship::empty, |id| Relationship::to_one("users", id)),
        );

        self.create("posts", attributes, relationships)
    }
}

fn matches_filter(resource: &ApiResource, key: &str, value: &str) -> bool {
    match key {
        "q" => ["title", "content"].iter().any(|field| {
            resource
                .attributes
                .get(*field)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&value.to_lowercase()))
        }),
        "tag" => related_to(resource, "tags", value),
        _ if resource.relationships.contains_key(key) => related_to(resource, key, value),
        _ => resource
            .attributes
            .get(key)
            .is_some_and(|attribute| scalar_string(attribute) == value),
    }
}

fn related_to(resource: &ApiResource, relationship: &str, id: &str) -> bool {
    resource
        .relationships
        .get(relationship)
        .is_some_and(|r| r.identifiers().iter().any(|i| i.id == id))
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
