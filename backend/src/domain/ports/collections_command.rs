//! Driving port for collection mutations.

use async_trait::async_trait;

use crate::domain::collection::{
    CollectionId, CollectionUpdate, CollectionView, NewCollection,
};
use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::snippet::SnippetId;

/// Mutation surface over collections and their membership edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionsCommand: Send + Sync {
    async fn create(
        &self,
        caller: Caller,
        payload: NewCollection,
    ) -> Result<CollectionView, Error>;

    async fn update(
        &self,
        caller: Caller,
        id: CollectionId,
        payload: CollectionUpdate,
    ) -> Result<CollectionView, Error>;

    async fn delete(&self, caller: Caller, id: CollectionId) -> Result<(), Error>;

    /// Add a readable snippet to an owned collection. Duplicate
    /// membership is a conflict.
    async fn add_snippet(
        &self,
        caller: Caller,
        id: CollectionId,
        snippet: SnippetId,
    ) -> Result<CollectionView, Error>;

    /// Remove a snippet from an owned collection. A missing membership
    /// edge is not found.
    async fn remove_snippet(
        &self,
        caller: Caller,
        id: CollectionId,
        snippet: SnippetId,
    ) -> Result<CollectionView, Error>;
}
