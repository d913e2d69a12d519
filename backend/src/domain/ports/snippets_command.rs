//! Driving port for snippet mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::snippet::{LikeToggle, NewSnippet, SnippetId, SnippetUpdate, SnippetView};

/// Mutation surface over snippets. Every operation authenticates and
/// authorises before touching storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetsCommand: Send + Sync {
    async fn create(&self, caller: Caller, payload: NewSnippet) -> Result<SnippetView, Error>;

    async fn update(
        &self,
        caller: Caller,
        id: SnippetId,
        payload: SnippetUpdate,
    ) -> Result<SnippetView, Error>;

    async fn delete(&self, caller: Caller, id: SnippetId) -> Result<(), Error>;

    /// Flip the caller's like on a readable snippet.
    async fn toggle_like(&self, caller: Caller, id: SnippetId) -> Result<LikeToggle, Error>;
}
