//! Port for collection persistence and the membership edge set.

use async_trait::async_trait;

use crate::domain::collection::{Collection, CollectionId};
use crate::domain::query::CollectionQuery;
use crate::domain::snippet::{Snippet, SnippetId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by collection repository adapters.
    pub enum CollectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "collection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "collection repository query failed: {message}",
    }
}

/// Port for collection storage and membership edges.
///
/// Membership is a set of (collection, snippet) pairs. `add_member` and
/// `remove_member` report whether the set changed; services translate an
/// unchanged set into the caller-facing conflict or not-found outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    async fn insert(&self, collection: Collection) -> Result<(), CollectionRepositoryError>;

    async fn find_by_id(
        &self,
        id: &CollectionId,
    ) -> Result<Option<Collection>, CollectionRepositoryError>;

    async fn update(&self, collection: Collection) -> Result<(), CollectionRepositoryError>;

    /// Delete the collection and scrub its membership edges. Member
    /// snippets themselves survive. Returns `false` when the id is absent.
    async fn delete(&self, id: &CollectionId) -> Result<bool, CollectionRepositoryError>;

    /// Collections matching a composed listing query, ordered per the
    /// query. Page slicing is left to the caller.
    async fn list(
        &self,
        query: &CollectionQuery,
    ) -> Result<Vec<Collection>, CollectionRepositoryError>;

    /// Member snippets of a collection, newest first.
    async fn members(&self, id: &CollectionId)
    -> Result<Vec<Snippet>, CollectionRepositoryError>;

    async fn member_count(&self, id: &CollectionId) -> Result<usize, CollectionRepositoryError>;

    /// Insert the membership edge. Returns `false` when it already existed.
    async fn add_member(
        &self,
        id: &CollectionId,
        snippet: &SnippetId,
    ) -> Result<bool, CollectionRepositoryError>;

    /// Remove the membership edge. Returns `false` when it was absent.
    async fn remove_member(
        &self,
        id: &CollectionId,
        snippet: &SnippetId,
    ) -> Result<bool, CollectionRepositoryError>;
}
