//! Opaque cursor and pagination envelope primitives.
//!
//! Listing endpoints share two pagination styles: keyset ("cursor")
//! continuation for feeds that must stay stable under concurrent inserts,
//! and numbered pages where staleness is tolerable. Both live here so the
//! backend's adapters agree on page-size clamping and cursor encoding.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Page size applied when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound on caller-requested page sizes.
pub const MAX_PAGE_SIZE: usize = 100;

/// Clamp a requested page size into the supported range.
///
/// # Examples
/// ```
/// use pagination::{clamp_page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
///
/// assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
/// assert_eq!(clamp_page_size(Some(0)), 1);
/// assert_eq!(clamp_page_size(Some(1_000)), MAX_PAGE_SIZE);
/// ```
#[must_use]
pub fn clamp_page_size(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Errors raised while decoding an opaque cursor supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The cursor was not valid URL-safe base64.
    #[error("cursor is not valid base64")]
    Encoding,
    /// The decoded cursor did not match the expected
    /// `direction:micros:key` shape.
    #[error("cursor payload is malformed")]
    Malformed,
}

/// Opaque keyset-pagination cursor.
///
/// A cursor names a boundary position as a `(timestamp, key)` pair plus the
/// direction to page in from there. The timestamp is microseconds since the
/// Unix epoch; the key is an opaque tie-breaker (typically the record id)
/// so two records created in the same microsecond still order
/// deterministically. Forward cursors continue after the boundary, backward
/// cursors fetch the window immediately before it.
///
/// The wire form is URL-safe base64 over `"{direction}:{micros}:{key}"`
/// where direction is `n` (next) or `p` (previous). Clients must treat it
/// as opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    created_at_micros: i64,
    key: String,
    backward: bool,
}

impl Cursor {
    /// Build a forward cursor: the page after this position.
    pub fn new(created_at_micros: i64, key: impl Into<String>) -> Self {
        Self {
            created_at_micros,
            key: key.into(),
            backward: false,
        }
    }

    /// Build a backward cursor: the page immediately before this position.
    pub fn backward(created_at_micros: i64, key: impl Into<String>) -> Self {
        Self {
            backward: true,
            ..Self::new(created_at_micros, key)
        }
    }

    /// Timestamp component, microseconds since the Unix epoch.
    #[must_use]
    pub fn created_at_micros(&self) -> i64 {
        self.created_at_micros
    }

    /// Tie-breaking key component.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Whether this cursor pages backwards from its boundary.
    #[must_use]
    pub fn is_backward(&self) -> bool {
        self.backward
    }

    /// Encode into the opaque wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        let direction = if self.backward { 'p' } else { 'n' };
        URL_SAFE_NO_PAD.encode(format!(
            "{direction}:{}:{}",
            self.created_at_micros, self.key
        ))
    }

    /// Decode a client-supplied cursor.
    pub fn decode(raw: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw.trim())
            .map_err(|_| CursorError::Encoding)?;
        let text = String::from_utf8(bytes).map_err(|_| CursorError::Malformed)?;
        let (direction, position) = text.split_once(':').ok_or(CursorError::Malformed)?;
        let backward = match direction {
            "n" => false,
            "p" => true,
            _ => return Err(CursorError::Malformed),
        };
        let (micros, key) = position.split_once(':').ok_or(CursorError::Malformed)?;
        let created_at_micros: i64 = micros.parse().map_err(|_| CursorError::Malformed)?;
        if key.is_empty() {
            return Err(CursorError::Malformed);
        }
        Ok(Self {
            created_at_micros,
            key: key.to_owned(),
            backward,
        })
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Rewrite a request URL so its `cursor` query parameter points at the
/// given continuation, preserving every other parameter.
#[must_use]
pub fn with_cursor(base: &Url, cursor: &Cursor) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(name, _)| name != "cursor")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    let mut next = base.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("cursor", &cursor.encode());
    next
}

/// Hypermedia links for a paginated response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

/// Offset-style page envelope for listings where staleness under
/// concurrent insert is tolerable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedPage<T> {
    /// Total matching records before slicing.
    pub count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub results: Vec<T>,
}

impl<T> NumberedPage<T> {
    /// Slice an already-filtered, already-ordered result set.
    ///
    /// `page` is 1-based; out-of-range pages clamp to the last page rather
    /// than erroring, and an empty result set still reports one (empty)
    /// page.
    #[must_use]
    pub fn paginate(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let count = items.len();
        let total_pages = count.div_ceil(page_size).max(1);
        let current_page = page.clamp(1, total_pages);
        let results = items
            .into_iter()
            .skip((current_page - 1) * page_size)
            .take(page_size)
            .collect();
        Self {
            count,
            total_pages,
            current_page,
            results,
        }
    }
}
