//! Flarum model types.

mod discussion;
mod post;
mod tag;
mod user;

pub use discussion::*;
pub use post::*;
pub use tag::*;
pub use user::*;

use serde_json::{Map, Value};

use crate::client::FlarumClient;
use crate::document::{ApiResource, Relationships};

/// Resource data owned by every model, plus the client used for follow-up
/// requests.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub(crate) client: FlarumClient,
    pub(crate) id: String,
    pub(crate) resource_type: String,
    pub(crate) attributes: Map<String, Value>,
    pub(crate) relationships: Relationships,
}

impl ModelData {
    pub fn new(client: FlarumClient, resource: ApiResource) -> Self {
        Self {
            client,
            id: resource.id,
            resource_type: resource.resource_type,
            attributes: resource.attributes,
            relationships: resource.relationships,
        }
    }

    pub(crate) fn str_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub(crate) fn u64_attr(&self, key: &str) -> Option<u64> {
        self.attributes.get(key).and_then(Value::as_u64)
    }

    pub(crate) fn bool_attr(&self, key: &str) -> bool {
        self.attributes
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
