//! Pagination parameters and links for JSON:API collections.

use serde::{Deserialize, Serialize};

/// `page[...]` query parameters.
///
/// A bare page number converts into `PageParams` via `From<u32>`, which
/// serializes to `page[number]=N` only. A bare `0` means "no page" and emits
/// nothing; use [`PageParams::number`] to send `page[number]=0` explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Page number (`page[number]`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Page size (`page[limit]`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Item offset (`page[offset]`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl PageParams {
    /// Parameters for a specific page number.
    #[must_use]
    pub fn number(number: u32) -> Self {
        Self {
            number: Some(number),
            ..Default::default()
        }
    }

    /// Parameters for an offset/limit window.
    #[must_use]
    pub fn window(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
            number: None,
        }
    }

    /// Set the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query pairs in `number`, `limit`, `offset` order.
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        [
            ("number", self.number),
            ("limit", self.limit),
            ("offset", self.offset),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (format!("page[{key}]"), v.to_string())))
        .collect()
    }
}

impl From<u32> for PageParams {
    fn from(number: u32) -> Self {
        if number == 0 {
            return Self::default();
        }
        Self::number(number)
    }
}

/// Pagination links returned alongside a collection document.
///
/// These are exposed as-is; the client never follows them on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl Links {
    /// Whether the server advertised a next page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Whether the server advertised a previous page.
    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }
}
