//! Error types for Flarum API operations.

use thiserror::Error;

/// Errors that can occur during Flarum API operations.
#[derive(Debug, Error)]
pub enum FlarumError {
    /// Configuration is missing or incomplete.
    #[error("Flarum configuration required: {0}")]
    ConfigMissing(String),

    /// The API token cannot be sent as an HTTP header value.
    #[error("API token contains characters not allowed in a header")]
    InvalidToken,

    /// An expected resource was absent from an otherwise successful response.
    #[error("{0}")]
    NotFound(String),

    /// An endpoint resolved outside the configured API base.
    #[error("Endpoint '{0}' is not a path under the API base URL")]
    InvalidEndpoint(String),

    /// The server answered 204 where a JSON document was required.
    #[error("Empty response from '{endpoint}'")]
    EmptyResponse { endpoint: String },

    /// API request failed with a non-2xx status.
    ///
    /// `body` holds the server's error document when it was valid JSON.
    #[error("API request failed: {status} {status_text}{}", detail_suffix(.body))]
    Api {
        status: u16,
        status_text: String,
        body: Option<serde_json::Value>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl FlarumError {
    /// HTTP status of a failed API request, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a 404 from the server or a local not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || self.status() == Some(404)
    }
}

fn detail_suffix(body: &Option<serde_json::Value>) -> String {
    body.as_ref()
        .map(|b| format!("\n{b}"))
        .unwrap_or_default()
}

/// Result type alias for Flarum operations.
pub type Result<T> = core::result::Result<T, FlarumError>;
