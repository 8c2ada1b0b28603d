//! Request options and the JSON:API query-string serializer.

use std::fmt;

use serde_json::Value;

use crate::pagination::PageParams;

/// HTTP methods used by the Flarum API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Whether requests with this method carry a JSON body.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Patch)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Options for a single API request.
///
/// Built with chained setters:
///
/// ```
/// use flarumapi::RequestOptions;
///
/// let options = RequestOptions::new()
///     .include(["user", "tags"])
///     .filter("q", "rust")
///     .sort("-createdAt")
///     .page(2);
///
/// assert_eq!(
///     options.query_pairs(),
///     vec![
///         ("include".to_string(), "user,tags".to_string()),
///         ("sort".to_string(), "-createdAt".to_string()),
///         ("filter[q]".to_string(), "rust".to_string()),
///         ("page[number]".to_string(), "2".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    /// Passthrough parameters, appended verbatim in insertion order.
    pub params: Vec<(String, String)>,
    /// Relationships to include, joined into one `include` parameter.
    pub include: Vec<String>,
    /// Sparse fieldsets per resource type.
    pub fields: Vec<(String, Vec<String>)>,
    pub sort: Option<String>,
    /// Filters, one `filter[key]` parameter each. Keys are unique.
    pub filter: Vec<(String, String)>,
    pub page: Option<PageParams>,
    /// JSON body, sent only for POST and PATCH.
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Append a passthrough query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Append a passthrough parameter whose value is a list, comma-joined.
    #[must_use]
    pub fn param_list<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = join(values);
        self.params.push((key.into(), joined));
        self
    }

    #[must_use]
    pub fn include<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(relations.into_iter().map(Into::into));
        self
    }

    /// Limit the attributes returned for `resource_type`.
    #[must_use]
    pub fn fields<I, S>(mut self, resource_type: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resource_type = resource_type.into();
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        match self.fields.iter_mut().find(|(t, _)| *t == resource_type) {
            Some((_, existing)) => *existing = fields,
            None => self.fields.push((resource_type, fields)),
        }
        self
    }

    /// Sort order, e.g. `-createdAt`. An empty string sends no `sort`.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Set a filter, replacing any earlier value for the same key.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set_filter(key, value);
        self
    }

    /// In-place form of [`RequestOptions::filter`].
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        let key = key.into();
        let value = value.to_string();
        match self.filter.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.filter.push((key, value)),
        }
    }

    #[must_use]
    pub fn page(mut self, page: impl Into<PageParams>) -> Self {
        self.page = Some(page.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize into ordered query pairs.
    ///
    /// Order: params, `include`, `fields[type]`, `sort`, `filter[key]`, `page[...]`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.params.clone();

        if !self.include.is_empty() {
            pairs.push(("include".to_string(), self.include.join(",")));
        }

        for (resource_type, fields) in &self.fields {
            pairs.push((format!("fields[{resource_type}]"), join(fields)));
        }

        if let Some(sort) = self.sort.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("sort".to_string(), sort.clone()));
        }

        for (key, value) in &self.filter {
            pairs.push((format!("filter[{key}]"), value.clone()));
        }

        if let Some(page) = &self.page {
            pairs.extend(page.query_pairs());
        }

        pairs
    }

    /// The body to attach, if the method allows one.
    pub(crate) fn request_body(&self) -> Option<&Value> {
        self.body.as_ref().filter(|_| self.method.has_body())
    }
}

fn join<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
