//! Port for snippet persistence and the like edge set.

use async_trait::async_trait;

use crate::domain::query::{SnippetQuery, SnippetSlice};
use crate::domain::snippet::{LikeState, Snippet, SnippetId};
use crate::domain::user::UserId;
use crate::domain::visibility::ReadScope;

use super::define_port_error;

define_port_error! {
    /// Errors raised by snippet repository adapters.
    pub enum SnippetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "snippet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "snippet repository query failed: {message}",
    }
}

/// Port for snippet storage, listing and like edges.
///
/// Likes are a set of (user, snippet) pairs. `toggle_like` flips the edge
/// atomically so two racing toggles cannot double-count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    async fn insert(&self, snippet: Snippet) -> Result<(), SnippetRepositoryError>;

    async fn find_by_id(
        &self,
        id: &SnippetId,
    ) -> Result<Option<Snippet>, SnippetRepositoryError>;

    async fn update(&self, snippet: Snippet) -> Result<(), SnippetRepositoryError>;

    /// Delete the snippet and scrub its like and membership edges.
    /// Returns `false` when the id is absent.
    async fn delete(&self, id: &SnippetId) -> Result<bool, SnippetRepositoryError>;

    /// Execute a composed listing query, returning one page plus whether
    /// more items follow it.
    async fn list(&self, query: &SnippetQuery) -> Result<SnippetSlice, SnippetRepositoryError>;

    /// Every snippet owned by `owner` that `scope` admits, newest first.
    async fn list_owned(
        &self,
        owner: &UserId,
        scope: &ReadScope,
    ) -> Result<Vec<Snippet>, SnippetRepositoryError>;

    async fn like_count(&self, id: &SnippetId) -> Result<usize, SnippetRepositoryError>;

    async fn is_liked(
        &self,
        user: &UserId,
        id: &SnippetId,
    ) -> Result<bool, SnippetRepositoryError>;

    /// Flip the (user, snippet) like edge in one step and report the
    /// resulting state.
    async fn toggle_like(
        &self,
        user: &UserId,
        id: &SnippetId,
    ) -> Result<LikeState, SnippetRepositoryError>;
}
