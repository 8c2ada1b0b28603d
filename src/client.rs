//! Flarum API client.
//!
//! Low-level HTTP client that handles base URL normalization, token
//! authentication and raw JSON:API requests. Typed operations live on
//! [`Collection`](crate::Collection) and the [`Model`](crate::Model) trait.

use std::env;
use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::document::ApiResponse;
use crate::error::{FlarumError, Result};
use crate::models::{Discussion, Post, Tag, User};
use crate::query::{Method, RequestOptions};
use crate::resources::Collection;

const USER_AGENT: &str = concat!("flarumapi/", env!("CARGO_PKG_VERSION"));

/// Optional settings accepted at construction.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// API token sent as `Authorization: Token <token>`.
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

/// Values accepted as a forum base URL.
pub trait IntoBaseUrl {
    fn into_base_url(self) -> Result<Url>;
}

impl IntoBaseUrl for Url {
    fn into_base_url(self) -> Result<Url> {
        Ok(self)
    }
}

impl IntoBaseUrl for &Url {
    fn into_base_url(self) -> Result<Url> {
        Ok(self.clone())
    }
}

impl IntoBaseUrl for &str {
    fn into_base_url(self) -> Result<Url> {
        Ok(Url::parse(self)?)
    }
}

impl IntoBaseUrl for String {
    fn into_base_url(self) -> Result<Url> {
        self.as_str().into_base_url()
    }
}

impl IntoBaseUrl for &String {
    fn into_base_url(self) -> Result<Url> {
        self.as_str().into_base_url()
    }
}

/// Response of the `token` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    #[serde(default, deserialize_with = "id_as_string")]
    pub user_id: Option<String>,
}

// Flarum returns `userId` as a number; other servers may send a string.
fn id_as_string<'de, D>(deserializer: D) -> core::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Serialize)]
struct Credentials<'a> {
    identification: &'a str,
    password: &'a str,
}

/// Low-level Flarum API client.
///
/// This struct is cheaply cloneable; clones share the same connection pool
/// and the same token, so [`FlarumClient::set_token`] on one clone affects
/// every model built from any of them.
///
/// # Example
///
/// ```no_run
/// use flarumapi::{ClientConfig, FlarumClient};
///
/// # async fn example() -> flarumapi::Result<()> {
/// // Root URLs get `api/` appended: https://discuss.example.com/api/
/// let client = FlarumClient::new("https://discuss.example.com", ClientConfig::default())?;
/// client.create_token("admin", "secret").await?;
///
/// let discussions = client.discussions().get_all(&Default::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FlarumClient {
    http: Client,
    base_url: Arc<Url>,
    token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for FlarumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlarumClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.has_token())
            .finish_non_exhaustive()
    }
}

impl FlarumClient {
    /// Create a client from environment variables.
    ///
    /// Uses `FLARUM_URL` for the forum URL and optionally `FLARUM_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if `FLARUM_URL` is not set or is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let url = env::var("FLARUM_URL").map_err(|_| {
            FlarumError::ConfigMissing("FLARUM_URL environment variable not set".to_string())
        })?;

        let config = ClientConfig {
            token: env::var("FLARUM_API_TOKEN").ok().filter(|t| !t.is_empty()),
        };

        Self::new(url, config)
    }

    /// Create a new client for the forum at `url`.
    ///
    /// A URL without a path (or with `/`) resolves to `<origin>/api/`; any
    /// other path is kept and gets a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(url: impl IntoBaseUrl, config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(url.into_base_url()?);

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(FlarumError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: Arc::new(RwLock::new(config.token)),
        })
    }

    /// Get the effective base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Use `token` for all subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Stop sending an `Authorization` header.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a token is currently set.
    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Exchange credentials for an API token and start using it.
    ///
    /// # Errors
    ///
    /// Returns [`FlarumError::Api`] if the server rejects the credentials.
    #[tracing::instrument(skip(self, password))]
    pub async fn create_token(&self, identification: &str, password: &str) -> Result<TokenResponse> {
        let body = serde_json::to_value(Credentials {
            identification,
            password,
        })?;
        let options = RequestOptions::new().method(Method::Post).body(body);

        let response: TokenResponse = self.request_json("token", &options).await?;
        self.set_token(response.token.clone());
        Ok(response)
    }

    /// Access user operations.
    pub fn users(&self) -> Collection<User> {
        Collection::new(self.clone())
    }

    /// Access discussion operations.
    pub fn discussions(&self) -> Collection<Discussion> {
        Collection::new(self.clone())
    }

    /// Access tag operations.
    pub fn tags(&self) -> Collection<Tag> {
        Collection::new(self.clone())
    }

    /// Access post operations.
    pub fn posts(&self) -> Collection<Post> {
        Collection::new(self.clone())
    }

    /// Resolve an endpoint and its query parameters against the base URL.
    ///
    /// A leading `api/` (or `/`) on the endpoint is ignored since the base
    /// already points at the API root.
    ///
    /// # Errors
    ///
    /// Returns [`FlarumError::InvalidEndpoint`] if the endpoint would leave
    /// the base URL, e.g. an absolute URL or a `..` segment. The token is
    /// only ever sent to the configured forum.
    pub fn endpoint_url(&self, endpoint: &str, options: &RequestOptions) -> Result<Url> {
        let relative = endpoint.trim_start_matches('/');
        let relative = relative.strip_prefix("api/").unwrap_or(relative);

        let mut url = self.base_url.join(relative)?;
        if !url.as_str().starts_with(self.base_url.as_str()) {
            return Err(FlarumError::InvalidEndpoint(endpoint.to_string()));
        }

        let pairs = options.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = self.current_token() {
            let value = HeaderValue::from_str(&format!("Token {token}"))
                .map_err(|_| FlarumError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Make a request and return the decoded JSON body.
    ///
    /// Returns `Ok(None)` for `204 No Content` without reading the body.
    ///
    /// # Errors
    ///
    /// Any non-2xx status becomes [`FlarumError::Api`]; transport and JSON
    /// decoding failures surface as their own variants.
    #[tracing::instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, endpoint: &str, options: &RequestOptions) -> Result<Option<Value>> {
        let url = self.endpoint_url(endpoint, options)?;
        tracing::debug!(%url, "sending request");

        let mut builder = self
            .http
            .request(options.method.into(), url)
            .headers(self.headers()?);

        if let Some(body) = options.request_body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(FlarumError::HttpError)?;
        let response = Self::check_response(response).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response.text().await.map_err(FlarumError::HttpError)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Make a request and deserialize the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`FlarumError::EmptyResponse`] if the server answered 204.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<T> {
        let value = self
            .request(endpoint, options)
            .await?
            .ok_or_else(|| FlarumError::EmptyResponse {
                endpoint: endpoint.to_string(),
            })?;
        Ok(serde_json::from_value(value)?)
    }

    /// Make a request and parse a JSON:API document.
    pub async fn request_document(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        self.request_json(endpoint, options).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "received response");

        if status.is_success() {
            return Ok(response);
        }

        // An unparsable error body is dropped rather than reported.
        let body = match response.text().await {
            Ok(text) => serde_json::from_str::<Value>(&text).ok(),
            Err(_) => None,
        };

        Err(FlarumError::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn normalize_base_url(mut url: Url) -> Url {
    let path = url.path();
    if path.is_empty() || path == "/" {
        url.set_path("/api/");
    } else if !path.ends_with('/') {
        let path = format!("{path}/");
        url.set_path(&path);
    }
    url
}
