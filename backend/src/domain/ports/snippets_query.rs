//! Driving port for snippet reads.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::query::{SnippetCriteria, SnippetPage};
use crate::domain::snippet::{SnippetId, SnippetView};

/// Read surface over snippets, scoped to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetsQuery: Send + Sync {
    /// List readable snippets matching the criteria, with continuation
    /// cursors in both directions under the creation-time order.
    async fn list(&self, caller: Caller, criteria: SnippetCriteria)
    -> Result<SnippetPage, Error>;

    /// Fetch one snippet the caller may read.
    async fn get(&self, caller: Caller, id: SnippetId) -> Result<SnippetView, Error>;
}
