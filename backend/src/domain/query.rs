//! Listing criteria and their composition into store queries.
//!
//! A criteria struct is what a caller sends (query-string shaped, every
//! field optional, unknown fields ignored). Composition pins the caller's
//! read scope first, normalises search terms and ordering, and decodes
//! pagination, producing the query object a repository executes.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use pagination::{Cursor, clamp_page_size};

use crate::domain::error::Error;
use crate::domain::snippet::{Snippet, SnippetId, SnippetView};
use crate::domain::visibility::ReadScope;

/// Sort direction plus key, parsed from an `ordering` parameter in the
/// `-created_at` / `title` style. Disallowed keys fall back to the
/// default rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering<K> {
    pub key: K,
    pub descending: bool,
}

/// Ordering keys allowed for snippet listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnippetOrderKey {
    #[default]
    CreatedAt,
    Likes,
    Title,
}

/// Ordering keys allowed for collection listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionOrderKey {
    #[default]
    CreatedAt,
    Name,
}

impl<K: Default> Ordering<K> {
    /// Default order: newest first.
    pub fn newest_first() -> Self {
        Self {
            key: K::default(),
            descending: true,
        }
    }
}

fn parse_ordering<K: Default>(
    raw: Option<&str>,
    key_for: impl Fn(&str) -> Option<K>,
) -> Ordering<K> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ordering::newest_first();
    };
    let (descending, name) = match raw.strip_prefix('-') {
        Some(name) => (true, name),
        None => (false, raw),
    };
    match key_for(name) {
        Some(key) => Ordering { key, descending },
        None => Ordering::newest_first(),
    }
}

impl Ordering<SnippetOrderKey> {
    pub fn parse(raw: Option<&str>) -> Self {
        parse_ordering(raw, |name| match name {
            "created_at" => Some(SnippetOrderKey::CreatedAt),
            "likes" => Some(SnippetOrderKey::Likes),
            "title" => Some(SnippetOrderKey::Title),
            _ => None,
        })
    }
}

impl Ordering<CollectionOrderKey> {
    pub fn parse(raw: Option<&str>) -> Self {
        parse_ordering(raw, |name| match name {
            "created_at" => Some(CollectionOrderKey::CreatedAt),
            "name" => Some(CollectionOrderKey::Name),
            _ => None,
        })
    }
}

fn normalise_search(raw: Option<String>) -> Option<String> {
    raw.map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
}

/// Keyset position within a snippet listing ordered by (created_at, id)
/// descending, plus the direction to page in from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetCursor {
    pub created_at_micros: i64,
    pub id: SnippetId,
    pub backward: bool,
}

impl SnippetCursor {
    /// The position of a listed snippet, for continuing after it.
    pub fn after(snippet: &Snippet) -> Self {
        Self {
            created_at_micros: snippet.created_at.timestamp_micros(),
            id: snippet.id,
            backward: false,
        }
    }

    /// The position of a listed snippet, for the page preceding it.
    pub fn before(snippet: &Snippet) -> Self {
        Self {
            backward: true,
            ..Self::after(snippet)
        }
    }

    pub fn encode(&self) -> String {
        let key = self.id.to_string();
        let cursor = if self.backward {
            Cursor::backward(self.created_at_micros, key)
        } else {
            Cursor::new(self.created_at_micros, key)
        };
        cursor.encode()
    }

    pub fn decode(raw: &str) -> Result<Self, Error> {
        let invalid = || Error::invalid_request("invalid pagination cursor");
        let cursor = Cursor::decode(raw).map_err(|_| invalid())?;
        let id = Uuid::parse_str(cursor.key()).map_err(|_| invalid())?;
        Ok(Self {
            created_at_micros: cursor.created_at_micros(),
            id: SnippetId::from(id),
            backward: cursor.is_backward(),
        })
    }

    /// Sort position of a snippet for comparison against this cursor.
    pub fn position(snippet: &Snippet) -> (i64, SnippetId) {
        (snippet.created_at.timestamp_micros(), snippet.id)
    }
}

/// Caller-supplied snippet listing criteria.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnippetCriteria {
    pub language: Option<String>,
    pub is_public: Option<bool>,
    pub owner_username: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub likes_min: Option<usize>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub cursor: Option<String>,
    pub page_size: Option<usize>,
}

impl SnippetCriteria {
    /// Compose the store query for this caller scope.
    pub fn compose(self, scope: ReadScope) -> Result<SnippetQuery, Error> {
        let order = Ordering::<SnippetOrderKey>::parse(self.ordering.as_deref());
        // Keyset continuation only lines up with the mandated
        // (created_at, id) order; alternate orderings page from the top.
        let cursor = match (&order.key, self.cursor) {
            (SnippetOrderKey::CreatedAt, Some(raw)) => Some(SnippetCursor::decode(&raw)?),
            _ => None,
        };
        Ok(SnippetQuery {
            scope,
            language: self.language,
            is_public: self.is_public,
            owner_username: self.owner_username,
            created_after: self.created_after,
            created_before: self.created_before,
            likes_min: self.likes_min,
            search: normalise_search(self.search),
            order,
            cursor,
            limit: clamp_page_size(self.page_size),
        })
    }
}

/// Fully composed snippet listing query, executed by the entity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetQuery {
    pub scope: ReadScope,
    /// Exact language tag; an unknown tag simply matches nothing.
    pub language: Option<String>,
    pub is_public: Option<bool>,
    /// Case-insensitive exact username match.
    pub owner_username: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    /// Minimum like count.
    pub likes_min: Option<usize>,
    /// Lowercased substring matched against title, description and
    /// language.
    pub search: Option<String>,
    pub order: Ordering<SnippetOrderKey>,
    pub cursor: Option<SnippetCursor>,
    pub limit: usize,
}

/// One store page of snippets plus whether more follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetSlice {
    pub items: Vec<Snippet>,
    pub has_more: bool,
}

/// Caller-facing snippet page with opaque continuation cursors in both
/// directions. Both stay empty under orderings other than creation time,
/// where keyset positions do not line up with the listing order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetPage {
    pub items: Vec<SnippetView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_cursor: Option<String>,
}

/// Caller-supplied collection listing criteria.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectionCriteria {
    pub is_public: Option<bool>,
    pub owner_username: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub snippets_count: Option<usize>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl CollectionCriteria {
    pub fn compose(self, scope: ReadScope) -> CollectionQuery {
        CollectionQuery {
            scope,
            is_public: self.is_public,
            owner_username: self.owner_username,
            created_after: self.created_after,
            created_before: self.created_before,
            snippets_count: self.snippets_count,
            search: normalise_search(self.search),
            order: Ordering::<CollectionOrderKey>::parse(self.ordering.as_deref()),
        }
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> usize {
        clamp_page_size(self.page_size)
    }
}

/// Fully composed collection listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub scope: ReadScope,
    pub is_public: Option<bool>,
    pub owner_username: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    /// Exact member count, mirroring the derived-count filter.
    pub snippets_count: Option<usize>,
    /// Lowercased substring matched against name and description.
    pub search: Option<String>,
    pub order: Ordering<CollectionOrderKey>,
}

/// Caller-supplied user listing criteria.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserCriteria {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl UserCriteria {
    pub fn compose(self, scope: ReadScope) -> UserQuery {
        UserQuery {
            scope,
            search: normalise_search(self.search),
        }
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> usize {
        clamp_page_size(self.page_size)
    }
}

/// Fully composed user listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub scope: ReadScope,
    /// Lowercased substring matched against username and location.
    pub search: Option<String>,
}
