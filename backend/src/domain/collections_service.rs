//! Collection domain service.
//!
//! Implements the collection driving ports, including the membership
//! mutations. Membership edits authorise against the collection with write
//! intent and against the snippet with read intent, so a caller can curate
//! any snippet they could also open.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::NumberedPage;
use tracing::info;

use crate::domain::collection::{
    Collection, CollectionDetail, CollectionId, CollectionUpdate, CollectionView, NewCollection,
};
use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::ports::{
    CollectionRepository, CollectionRepositoryError, CollectionsCommand, CollectionsQuery,
    SnippetRepository, UserRepository,
};
use crate::domain::query::CollectionCriteria;
use crate::domain::snippet::{Snippet, SnippetId, SnippetView};
use crate::domain::snippets_service::{map_snippet_error, map_user_error};
use crate::domain::user::UserSummary;
use crate::domain::visibility::{self, Intent, ReadScope};

/// Collection service implementing the driving ports.
#[derive(Clone)]
pub struct CollectionsService<C, S, U> {
    collections: Arc<C>,
    snippets: Arc<S>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<C, S, U> CollectionsService<C, S, U> {
    pub fn new(
        collections: Arc<C>,
        snippets: Arc<S>,
        users: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            collections,
            snippets,
            users,
            clock,
        }
    }
}

fn map_collection_error(error: CollectionRepositoryError) -> Error {
    Error::internal(format!("collection repository error: {error}"))
}

fn collection_not_found() -> Error {
    Error::not_found("collection not found")
}

impl<C, S, U> CollectionsService<C, S, U>
where
    C: CollectionRepository,
    S: SnippetRepository,
    U: UserRepository,
{
    async fn fetch(&self, id: &CollectionId) -> Result<Collection, Error> {
        self.collections
            .find_by_id(id)
            .await
            .map_err(map_collection_error)?
            .ok_or_else(collection_not_found)
    }

    async fn fetch_snippet(&self, id: &SnippetId) -> Result<Snippet, Error> {
        self.snippets
            .find_by_id(id)
            .await
            .map_err(map_snippet_error)?
            .ok_or_else(|| Error::not_found("snippet not found"))
    }

    async fn owner_summary(&self, collection: &Collection) -> Result<UserSummary, Error> {
        let owner = self
            .users
            .find_by_id(&collection.owner)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal("collection owner record is missing"))?;
        Ok(UserSummary::from(&owner))
    }

    async fn view(&self, collection: Collection) -> Result<CollectionView, Error> {
        let owner = self.owner_summary(&collection).await?;
        let snippet_count = self
            .collections
            .member_count(&collection.id)
            .await
            .map_err(map_collection_error)?;
        Ok(CollectionView::assemble(collection, owner, snippet_count))
    }

    async fn snippet_view(
        &self,
        caller: &Caller,
        snippet: Snippet,
    ) -> Result<SnippetView, Error> {
        let owner = self
            .users
            .find_by_id(&snippet.owner)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal("snippet owner record is missing"))?;
        let likes_count = self
            .snippets
            .like_count(&snippet.id)
            .await
            .map_err(map_snippet_error)?;
        let is_liked = match caller.user_id() {
            None => false,
            Some(user) => self
                .snippets
                .is_liked(user, &snippet.id)
                .await
                .map_err(map_snippet_error)?,
        };
        Ok(SnippetView::assemble(
            snippet,
            UserSummary::from(&owner),
            likes_count,
            is_liked,
        ))
    }
}

#[async_trait]
impl<C, S, U> CollectionsQuery for CollectionsService<C, S, U>
where
    C: CollectionRepository,
    S: SnippetRepository,
    U: UserRepository,
{
    async fn list(
        &self,
        caller: Caller,
        criteria: CollectionCriteria,
    ) -> Result<NumberedPage<CollectionView>, Error> {
        let scope = ReadScope::for_caller(&caller);
        let page = criteria.page();
        let page_size = criteria.page_size();
        let query = criteria.compose(scope);
        let collections = self
            .collections
            .list(&query)
            .await
            .map_err(map_collection_error)?;
        let mut views = Vec::with_capacity(collections.len());
        for collection in collections {
            views.push(self.view(collection).await?);
        }
        // The member-count filter needs assembled counts, so it applies
        // after view assembly rather than inside the store.
        if let Some(expected) = query.snippets_count {
            views.retain(|view| view.snippet_count == expected);
        }
        Ok(NumberedPage::paginate(views, page, page_size))
    }

    async fn get(&self, caller: Caller, id: CollectionId) -> Result<CollectionDetail, Error> {
        let collection = self.fetch(&id).await?;
        visibility::ensure(&caller, &collection, Intent::Read, "collection")?;
        let scope = ReadScope::for_caller(&caller);
        let members = self
            .collections
            .members(&id)
            .await
            .map_err(map_collection_error)?;
        let mut snippets = Vec::new();
        for snippet in members {
            if scope.admits(&snippet) {
                snippets.push(self.snippet_view(&caller, snippet).await?);
            }
        }
        let collection = self.view(collection).await?;
        Ok(CollectionDetail {
            collection,
            snippets,
        })
    }
}

#[async_trait]
impl<C, S, U> CollectionsCommand for CollectionsService<C, S, U>
where
    C: CollectionRepository,
    S: SnippetRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        caller: Caller,
        payload: NewCollection,
    ) -> Result<CollectionView, Error> {
        let owner = *caller.require_user_id()?;
        payload.validate().map_err(Error::validation)?;
        let now = self.clock.utc();
        let collection = Collection {
            id: CollectionId::random(),
            name: payload.name,
            description: payload.description,
            owner,
            is_public: payload.is_public,
            created_at: now,
            updated_at: now,
        };
        self.collections
            .insert(collection.clone())
            .await
            .map_err(map_collection_error)?;
        info!(collection = %collection.id, owner = %owner, "collection created");
        self.view(collection).await
    }

    async fn update(
        &self,
        caller: Caller,
        id: CollectionId,
        payload: CollectionUpdate,
    ) -> Result<CollectionView, Error> {
        let mut collection = self.fetch(&id).await?;
        visibility::ensure(&caller, &collection, Intent::Write, "collection")?;
        payload.validate().map_err(Error::validation)?;
        payload.apply(&mut collection, self.clock.utc());
        self.collections
            .update(collection.clone())
            .await
            .map_err(map_collection_error)?;
        info!(collection = %id, "collection updated");
        self.view(collection).await
    }

    async fn delete(&self, caller: Caller, id: CollectionId) -> Result<(), Error> {
        let collection = self.fetch(&id).await?;
        visibility::ensure(&caller, &collection, Intent::Write, "collection")?;
        let removed = self
            .collections
            .delete(&id)
            .await
            .map_err(map_collection_error)?;
        if !removed {
            return Err(collection_not_found());
        }
        info!(collection = %id, "collection deleted");
        Ok(())
    }

    async fn add_snippet(
        &self,
        caller: Caller,
        id: CollectionId,
        snippet: SnippetId,
    ) -> Result<CollectionView, Error> {
        let collection = self.fetch(&id).await?;
        visibility::ensure(&caller, &collection, Intent::Write, "collection")?;
        let member = self.fetch_snippet(&snippet).await?;
        visibility::ensure(&caller, &member, Intent::Read, "snippet")?;
        let added = self
            .collections
            .add_member(&id, &snippet)
            .await
            .map_err(map_collection_error)?;
        if !added {
            return Err(Error::conflict("snippet already in collection"));
        }
        info!(collection = %id, snippet = %snippet, "snippet added to collection");
        self.view(collection).await
    }

    async fn remove_snippet(
        &self,
        caller: Caller,
        id: CollectionId,
        snippet: SnippetId,
    ) -> Result<CollectionView, Error> {
        let collection = self.fetch(&id).await?;
        visibility::ensure(&caller, &collection, Intent::Write, "collection")?;
        let removed = self
            .collections
            .remove_member(&id, &snippet)
            .await
            .map_err(map_collection_error)?;
        if !removed {
            return Err(Error::not_found("snippet not found in collection"));
        }
        info!(collection = %id, snippet = %snippet, "snippet removed from collection");
        self.view(collection).await
    }
}
