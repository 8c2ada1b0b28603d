//! Resource collections and the response-to-model transformer.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use crate::client::FlarumClient;
use crate::document::{ApiResponse, Relationship, Relationships, RequestDocument};
use crate::error::{FlarumError, Result};
use crate::models::{Discussion, DiscussionOptions};
use crate::query::{Method, RequestOptions};
use crate::traits::Model;

/// Wrap the primary data of `document` as a single model.
///
/// A list response yields its first element.
///
/// # Errors
///
/// Returns [`FlarumError::NotFound`] if the response holds an empty list.
pub fn wrap_one<M: Model>(client: &FlarumClient, document: ApiResponse) -> Result<M> {
    document
        .data
        .into_first()
        .map(|resource| M::from_resource(client.clone(), resource))
        .ok_or_else(|| FlarumError::NotFound(format!("no {} in response", M::TYPE)))
}

/// Wrap every resource of `document`; a singular response becomes a
/// one-element list.
pub fn wrap_many<M: Model>(client: &FlarumClient, document: ApiResponse) -> Vec<M> {
    document
        .data
        .into_vec()
        .into_iter()
        .map(|resource| M::from_resource(client.clone(), resource))
        .collect()
}

/// GET the `M` collection with `options`, forcing `filter[key] = id`.
///
/// Shared by relationship navigation such as [`Discussion::posts`].
pub(crate) async fn fetch_filtered<M: Model>(
    client: &FlarumClient,
    options: &RequestOptions,
    key: &str,
    id: &str,
) -> Result<Vec<M>> {
    let mut options = options.clone().method(Method::Get);
    options.set_filter(key, id);

    let document = client.request_document(M::TYPE, &options).await?;
    Ok(wrap_many(client, document))
}

/// CRUD operations for one resource type.
///
/// Obtained from [`FlarumClient::users`], [`FlarumClient::discussions`],
/// [`FlarumClient::tags`] and [`FlarumClient::posts`]. Holds no state
/// besides the client; every call goes to the server.
pub struct Collection<M> {
    client: FlarumClient,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for Collection<M> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

impl<M> fmt::Debug for Collection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("model", &std::any::type_name::<M>())
            .finish_non_exhaustive()
    }
}

impl<M> Collection<M> {
    pub(crate) fn new(client: FlarumClient) -> Self {
        Self {
            client,
            _model: PhantomData,
        }
    }
}

impl<M: Model> Collection<M> {
    /// Fetch one resource by id.
    ///
    /// # Errors
    ///
    /// Returns [`FlarumError::Api`] with status 404 if the server has no
    /// such resource.
    #[tracing::instrument(skip(self, options), fields(resource = M::TYPE))]
    pub async fn get(&self, id: &str, options: &RequestOptions) -> Result<M> {
        let path = format!("{}/{}", M::TYPE, urlencoding::encode(id));
        let options = options.clone().method(Method::Get);

        let document = self.client.request_document(&path, &options).await?;
        wrap_one(&self.client, document)
    }

    /// Fetch the collection (one page, as the server returns it).
    #[tracing::instrument(skip(self, options), fields(resource = M::TYPE))]
    pub async fn get_all(&self, options: &RequestOptions) -> Result<Vec<M>> {
        let options = options.clone().method(Method::Get);

        let document = self.client.request_document(M::TYPE, &options).await?;
        Ok(wrap_many(&self.client, document))
    }

    /// Create a resource from attributes and optional relationships.
    #[tracing::instrument(skip_all, fields(resource = M::TYPE))]
    pub async fn create<A>(&self, attributes: &A, relationships: Option<Relationships>) -> Result<M>
    where
        A: Serialize + ?Sized,
    {
        let body = RequestDocument::new(M::TYPE, None, attributes, relationships.as_ref())
            .to_value()?;
        let options = RequestOptions::new().method(Method::Post).body(body);

        let document = self.client.request_document(M::TYPE, &options).await?;
        wrap_one(&self.client, document)
    }
}

impl Collection<Discussion> {
    /// Start a discussion with its first post and optional tags.
    pub async fn start(&self, options: &DiscussionOptions) -> Result<Discussion> {
        let attributes = serde_json::json!({
            "title": options.title,
            "content": options.content,
        });

        let relationships = (!options.tags.is_empty()).then(|| {
            let mut relationships = Relationships::new();
            relationships.insert(
                "tags".to_string(),
                Relationship::to_many("tags", options.tags.iter().cloned()),
            );
            relationships
        });

        self.create(&attributes, relationships).await
    }
}
