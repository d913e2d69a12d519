//! Driving port for collection reads.

use async_trait::async_trait;
use pagination::NumberedPage;

use crate::domain::collection::{CollectionDetail, CollectionId, CollectionView};
use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::query::CollectionCriteria;

/// Read surface over collections, scoped to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionsQuery: Send + Sync {
    async fn list(
        &self,
        caller: Caller,
        criteria: CollectionCriteria,
    ) -> Result<NumberedPage<CollectionView>, Error>;

    /// Fetch one collection with its member snippets, both filtered
    /// through the caller's read scope.
    async fn get(&self, caller: Caller, id: CollectionId) -> Result<CollectionDetail, Error>;
}
