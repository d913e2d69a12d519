//! In-memory persistence adapter.
//!
//! One [`RwLock`] guards every table and edge set, so each repository call
//! observes and produces a consistent snapshot. Cross-entity cascades and
//! the like toggle run under a single write guard, which gives them the
//! atomicity the ports require without any further coordination.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::collection::{Collection, CollectionId};
use crate::domain::ports::{
    CollectionRepository, CollectionRepositoryError, SnippetRepository, SnippetRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::query::{
    CollectionOrderKey, CollectionQuery, SnippetCursor, SnippetOrderKey, SnippetQuery,
    SnippetSlice, UserQuery,
};
use crate::domain::snippet::{LikeState, Snippet, SnippetId};
use crate::domain::user::{User, UserId};
use crate::domain::visibility::ReadScope;

#[derive(Debug, Default)]
struct StoreInner {
    users: HashMap<UserId, User>,
    snippets: HashMap<SnippetId, Snippet>,
    collections: HashMap<CollectionId, Collection>,
    likes: HashSet<(UserId, SnippetId)>,
    members: HashSet<(CollectionId, SnippetId)>,
}

impl StoreInner {
    fn like_count(&self, id: &SnippetId) -> usize {
        self.likes.iter().filter(|(_, snippet)| snippet == id).count()
    }

    fn member_count(&self, id: &CollectionId) -> usize {
        self.members
            .iter()
            .filter(|(collection, _)| collection == id)
            .count()
    }

    /// Resolve a username filter to a user id, case-insensitively. An
    /// unknown name matches nothing rather than erroring.
    fn user_id_for_username(&self, username: &str) -> Option<UserId> {
        let wanted = username.to_lowercase();
        self.users
            .values()
            .find(|user| user.username.as_ref().to_lowercase() == wanted)
            .map(|user| user.id)
    }

    fn remove_snippet_edges(&mut self, id: &SnippetId) {
        self.likes.retain(|(_, snippet)| snippet != id);
        self.members.retain(|(_, snippet)| snippet != id);
    }
}

const LOCK_POISONED: &str = "store lock poisoned";

/// Shared in-memory store backing all three repository ports.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, &'static str> {
        self.inner.read().map_err(|_| LOCK_POISONED)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, &'static str> {
        self.inner.write().map_err(|_| LOCK_POISONED)
    }
}

fn snippet_matches(inner: &StoreInner, query: &SnippetQuery, snippet: &Snippet) -> bool {
    if !query.scope.admits(snippet) {
        return false;
    }
    if let Some(language) = &query.language {
        if snippet.language.as_str() != language.as_str() {
            return false;
        }
    }
    if let Some(is_public) = query.is_public {
        if snippet.is_public != is_public {
            return false;
        }
    }
    if let Some(username) = &query.owner_username {
        match inner.user_id_for_username(username) {
            Some(owner) if snippet.owner == owner => {}
            _ => return false,
        }
    }
    if let Some(after) = query.created_after {
        if snippet.created_at < after {
            return false;
        }
    }
    if let Some(before) = query.created_before {
        if snippet.created_at > before {
            return false;
        }
    }
    if let Some(minimum) = query.likes_min {
        if inner.like_count(&snippet.id) < minimum {
            return false;
        }
    }
    if let Some(term) = &query.search {
        let haystack = format!(
            "{} {} {}",
            snippet.title.to_lowercase(),
            snippet.description.to_lowercase(),
            snippet.language.as_str()
        );
        if !haystack.contains(term) {
            return false;
        }
    }
    true
}

fn sort_snippets(inner: &StoreInner, query: &SnippetQuery, snippets: &mut [Snippet]) {
    match query.order.key {
        SnippetOrderKey::CreatedAt => {
            snippets.sort_by_key(SnippetCursor::position);
        }
        SnippetOrderKey::Likes => {
            snippets.sort_by_key(|snippet| {
                (inner.like_count(&snippet.id), SnippetCursor::position(snippet))
            });
        }
        SnippetOrderKey::Title => {
            snippets
                .sort_by_key(|snippet| (snippet.title.to_lowercase(), snippet.id));
        }
    }
    if query.order.descending {
        snippets.reverse();
    }
}

fn collection_matches(inner: &StoreInner, query: &CollectionQuery, collection: &Collection) -> bool {
    if !query.scope.admits(collection) {
        return false;
    }
    if let Some(is_public) = query.is_public {
        if collection.is_public != is_public {
            return false;
        }
    }
    if let Some(username) = &query.owner_username {
        match inner.user_id_for_username(username) {
            Some(owner) if collection.owner == owner => {}
            _ => return false,
        }
    }
    if let Some(after) = query.created_after {
        if collection.created_at < after {
            return false;
        }
    }
    if let Some(before) = query.created_before {
        if collection.created_at > before {
            return false;
        }
    }
    if let Some(term) = &query.search {
        let haystack = format!(
            "{} {}",
            collection.name.to_lowercase(),
            collection.description.to_lowercase()
        );
        if !haystack.contains(term) {
            return false;
        }
    }
    true
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: User) -> Result<(), UserRepositoryError> {
        let mut inner = self.write().map_err(UserRepositoryError::connection)?;
        inner.users.insert(user.id, user);
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let inner = self.read().map_err(UserRepositoryError::connection)?;
        Ok(inner.users.get(id).cloned())
    }

    async fn update(&self, user: User) -> Result<(), UserRepositoryError> {
        let mut inner = self.write().map_err(UserRepositoryError::connection)?;
        if !inner.users.contains_key(&user.id) {
            return Err(UserRepositoryError::query(format!(
                "user {} does not exist",
                user.id
            )));
        }
        inner.users.insert(user.id, user);
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut inner = self.write().map_err(UserRepositoryError::connection)?;
        if inner.users.remove(id).is_none() {
            return Ok(false);
        }
        // Cascade over everything the user owned, under the same guard.
        let owned_snippets: Vec<SnippetId> = inner
            .snippets
            .values()
            .filter(|snippet| snippet.owner == *id)
            .map(|snippet| snippet.id)
            .collect();
        for snippet in &owned_snippets {
            inner.snippets.remove(snippet);
            inner.remove_snippet_edges(snippet);
        }
        let owned_collections: Vec<CollectionId> = inner
            .collections
            .values()
            .filter(|collection| collection.owner == *id)
            .map(|collection| collection.id)
            .collect();
        for collection in &owned_collections {
            inner.collections.remove(collection);
        }
        inner
            .members
            .retain(|(collection, _)| !owned_collections.contains(collection));
        inner.likes.retain(|(user, _)| user != id);
        Ok(true)
    }

    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, UserRepositoryError> {
        let inner = self.read().map_err(UserRepositoryError::connection)?;
        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|user| query.scope.admits(*user))
            .filter(|user| match &query.search {
                None => true,
                Some(term) => {
                    let haystack = format!(
                        "{} {}",
                        user.username.as_ref().to_lowercase(),
                        user.location.to_lowercase()
                    );
                    haystack.contains(term)
                }
            })
            .cloned()
            .collect();
        users.sort_by_key(|user| (user.created_at, user.id));
        users.reverse();
        Ok(users)
    }
}

#[async_trait]
impl SnippetRepository for MemoryStore {
    async fn insert(&self, snippet: Snippet) -> Result<(), SnippetRepositoryError> {
        let mut inner = self.write().map_err(SnippetRepositoryError::connection)?;
        inner.snippets.insert(snippet.id, snippet);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &SnippetId,
    ) -> Result<Option<Snippet>, SnippetRepositoryError> {
        let inner = self.read().map_err(SnippetRepositoryError::connection)?;
        Ok(inner.snippets.get(id).cloned())
    }

    async fn update(&self, snippet: Snippet) -> Result<(), SnippetRepositoryError> {
        let mut inner = self.write().map_err(SnippetRepositoryError::connection)?;
        if !inner.snippets.contains_key(&snippet.id) {
            return Err(SnippetRepositoryError::query(format!(
                "snippet {} does not exist",
                snippet.id
            )));
        }
        inner.snippets.insert(snippet.id, snippet);
        Ok(())
    }

    async fn delete(&self, id: &SnippetId) -> Result<bool, SnippetRepositoryError> {
        let mut inner = self.write().map_err(SnippetRepositoryError::connection)?;
        if inner.snippets.remove(id).is_none() {
            return Ok(false);
        }
        inner.remove_snippet_edges(id);
        Ok(true)
    }

    async fn list(&self, query: &SnippetQuery) -> Result<SnippetSlice, SnippetRepositoryError> {
        let inner = self.read().map_err(SnippetRepositoryError::connection)?;
        let mut snippets: Vec<Snippet> = inner
            .snippets
            .values()
            .filter(|snippet| snippet_matches(&inner, query, snippet))
            .cloned()
            .collect();
        sort_snippets(&inner, query, &mut snippets);
        let mut backward = false;
        if let Some(cursor) = &query.cursor {
            backward = cursor.backward;
            let boundary = (cursor.created_at_micros, cursor.id);
            // Listed earlier than the boundary, in display order.
            let precedes = |position: (i64, SnippetId)| {
                if query.order.descending {
                    position > boundary
                } else {
                    position < boundary
                }
            };
            snippets.retain(|snippet| {
                let position = SnippetCursor::position(snippet);
                if backward {
                    precedes(position)
                } else {
                    position != boundary && !precedes(position)
                }
            });
        }
        // A backward window keeps the items nearest its boundary, which sit
        // at the tail of the filtered listing.
        let has_more = if backward {
            let extra = snippets.len().saturating_sub(query.limit);
            snippets.drain(..extra);
            extra > 0
        } else {
            let has_more = snippets.len() > query.limit;
            snippets.truncate(query.limit);
            has_more
        };
        Ok(SnippetSlice {
            items: snippets,
            has_more,
        })
    }

    async fn list_owned(
        &self,
        owner: &UserId,
        scope: &ReadScope,
    ) -> Result<Vec<Snippet>, SnippetRepositoryError> {
        let inner = self.read().map_err(SnippetRepositoryError::connection)?;
        let mut snippets: Vec<Snippet> = inner
            .snippets
            .values()
            .filter(|snippet| snippet.owner == *owner && scope.admits(*snippet))
            .cloned()
            .collect();
        snippets.sort_by_key(SnippetCursor::position);
        snippets.reverse();
        Ok(snippets)
    }

    async fn like_count(&self, id: &SnippetId) -> Result<usize, SnippetRepositoryError> {
        let inner = self.read().map_err(SnippetRepositoryError::connection)?;
        Ok(inner.like_count(id))
    }

    async fn is_liked(
        &self,
        user: &UserId,
        id: &SnippetId,
    ) -> Result<bool, SnippetRepositoryError> {
        let inner = self.read().map_err(SnippetRepositoryError::connection)?;
        Ok(inner.likes.contains(&(*user, *id)))
    }

    async fn toggle_like(
        &self,
        user: &UserId,
        id: &SnippetId,
    ) -> Result<LikeState, SnippetRepositoryError> {
        let mut inner = self.write().map_err(SnippetRepositoryError::connection)?;
        let edge = (*user, *id);
        if inner.likes.remove(&edge) {
            Ok(LikeState::Unliked)
        } else {
            inner.likes.insert(edge);
            Ok(LikeState::Liked)
        }
    }
}

#[async_trait]
impl CollectionRepository for MemoryStore {
    async fn insert(&self, collection: Collection) -> Result<(), CollectionRepositoryError> {
        let mut inner = self.write().map_err(CollectionRepositoryError::connection)?;
        inner.collections.insert(collection.id, collection);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CollectionId,
    ) -> Result<Option<Collection>, CollectionRepositoryError> {
        let inner = self.read().map_err(CollectionRepositoryError::connection)?;
        Ok(inner.collections.get(id).cloned())
    }

    async fn update(&self, collection: Collection) -> Result<(), CollectionRepositoryError> {
        let mut inner = self.write().map_err(CollectionRepositoryError::connection)?;
        if !inner.collections.contains_key(&collection.id) {
            return Err(CollectionRepositoryError::query(format!(
                "collection {} does not exist",
                collection.id
            )));
        }
        inner.collections.insert(collection.id, collection);
        Ok(())
    }

    async fn delete(&self, id: &CollectionId) -> Result<bool, CollectionRepositoryError> {
        let mut inner = self.write().map_err(CollectionRepositoryError::connection)?;
        if inner.collections.remove(id).is_none() {
            return Ok(false);
        }
        inner.members.retain(|(collection, _)| collection != id);
        Ok(true)
    }

    async fn list(
        &self,
        query: &CollectionQuery,
    ) -> Result<Vec<Collection>, CollectionRepositoryError> {
        let inner = self.read().map_err(CollectionRepositoryError::connection)?;
        let mut collections: Vec<Collection> = inner
            .collections
            .values()
            .filter(|collection| collection_matches(&inner, query, collection))
            .cloned()
            .collect();
        match query.order.key {
            CollectionOrderKey::CreatedAt => {
                collections.sort_by_key(|collection| (collection.created_at, collection.id));
            }
            CollectionOrderKey::Name => {
                collections
                    .sort_by_key(|collection| (collection.name.to_lowercase(), collection.id));
            }
        }
        if query.order.descending {
            collections.reverse();
        }
        Ok(collections)
    }

    async fn members(
        &self,
        id: &CollectionId,
    ) -> Result<Vec<Snippet>, CollectionRepositoryError> {
        let inner = self.read().map_err(CollectionRepositoryError::connection)?;
        let mut snippets: Vec<Snippet> = inner
            .members
            .iter()
            .filter(|(collection, _)| collection == id)
            .filter_map(|(_, snippet)| inner.snippets.get(snippet).cloned())
            .collect();
        snippets.sort_by_key(SnippetCursor::position);
        snippets.reverse();
        Ok(snippets)
    }

    async fn member_count(
        &self,
        id: &CollectionId,
    ) -> Result<usize, CollectionRepositoryError> {
        let inner = self.read().map_err(CollectionRepositoryError::connection)?;
        Ok(inner.member_count(id))
    }

    async fn add_member(
        &self,
        id: &CollectionId,
        snippet: &SnippetId,
    ) -> Result<bool, CollectionRepositoryError> {
        let mut inner = self.write().map_err(CollectionRepositoryError::connection)?;
        Ok(inner.members.insert((*id, *snippet)))
    }

    async fn remove_member(
        &self,
        id: &CollectionId,
        snippet: &SnippetId,
    ) -> Result<bool, CollectionRepositoryError> {
        let mut inner = self.write().map_err(CollectionRepositoryError::connection)?;
        Ok(inner.members.remove(&(*id, *snippet)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{SnippetCriteria, UserCriteria};
    use crate::domain::snippet::Language;
    use crate::domain::user::{EmailAddress, Username};
    use chrono::{Duration, Utc};

    fn make_user(name: &str) -> User {
        User::new(
            UserId::random(),
            Username::new(name).expect("valid"),
            EmailAddress::new(format!("{name}@example.org")).expect("valid"),
            Utc::now(),
        )
    }

    fn make_snippet(owner: UserId, title: &str, is_public: bool) -> Snippet {
        let now = Utc::now();
        Snippet {
            id: SnippetId::random(),
            title: title.into(),
            code_content: "fn main() {}".into(),
            language: Language::Python,
            description: String::new(),
            owner,
            is_public,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_collection(owner: UserId, name: &str) -> Collection {
        let now = Utc::now();
        Collection {
            id: CollectionId::random(),
            name: name.into(),
            description: String::new(),
            owner,
            is_public: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn seed_snippets(store: &MemoryStore, owner: UserId, count: usize) -> Vec<SnippetId> {
        let base = Utc::now();
        let mut ids = Vec::new();
        for index in 0..count {
            let mut snippet = make_snippet(owner, &format!("Snippet {index}"), true);
            snippet.created_at = base + Duration::seconds(index as i64);
            snippet.updated_at = snippet.created_at;
            ids.push(snippet.id);
            SnippetRepository::insert(store, snippet).await.expect("insert");
        }
        ids
    }

    fn query(criteria: SnippetCriteria, scope: ReadScope) -> SnippetQuery {
        criteria.compose(scope).expect("composes")
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_over_everything_owned() {
        let store = MemoryStore::new();
        let ada = make_user("ada");
        let grace = make_user("grace");
        let ada_id = ada.id;
        let grace_id = grace.id;
        UserRepository::insert(&store, ada).await.expect("insert");
        UserRepository::insert(&store, grace).await.expect("insert");

        let owned = make_snippet(ada_id, "Owned", true);
        let owned_id = owned.id;
        let surviving = make_snippet(grace_id, "Surviving", true);
        let surviving_id = surviving.id;
        SnippetRepository::insert(&store, owned).await.expect("insert");
        SnippetRepository::insert(&store, surviving).await.expect("insert");

        let shelf = make_collection(ada_id, "Ada's shelf");
        let shelf_id = shelf.id;
        let other_shelf = make_collection(grace_id, "Grace's shelf");
        let other_shelf_id = other_shelf.id;
        CollectionRepository::insert(&store, shelf).await.expect("insert");
        CollectionRepository::insert(&store, other_shelf).await.expect("insert");

        // Ada likes Grace's snippet and Grace's shelf holds Ada's snippet.
        store.toggle_like(&ada_id, &surviving_id).await.expect("like");
        store.toggle_like(&grace_id, &owned_id).await.expect("like");
        store.add_member(&other_shelf_id, &owned_id).await.expect("member");
        store.add_member(&shelf_id, &surviving_id).await.expect("member");

        assert!(UserRepository::delete(&store, &ada_id).await.expect("delete"));

        assert!(
            SnippetRepository::find_by_id(&store, &owned_id)
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(
            CollectionRepository::find_by_id(&store, &shelf_id)
                .await
                .expect("lookup")
                .is_none()
        );
        // Grace's records survive with the dangling edges scrubbed.
        assert!(
            SnippetRepository::find_by_id(&store, &surviving_id)
                .await
                .expect("lookup")
                .is_some()
        );
        assert_eq!(store.like_count(&surviving_id).await.expect("count"), 0);
        assert_eq!(
            store.member_count(&other_shelf_id).await.expect("count"),
            0
        );
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_original_state() {
        let store = MemoryStore::new();
        let user = UserId::random();
        let snippet = make_snippet(UserId::random(), "Toggle me", true);
        let id = snippet.id;
        SnippetRepository::insert(&store, snippet).await.expect("insert");

        assert_eq!(
            store.toggle_like(&user, &id).await.expect("first"),
            LikeState::Liked
        );
        assert_eq!(store.like_count(&id).await.expect("count"), 1);
        assert_eq!(
            store.toggle_like(&user, &id).await.expect("second"),
            LikeState::Unliked
        );
        assert_eq!(store.like_count(&id).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn membership_edges_never_duplicate() {
        let store = MemoryStore::new();
        let collection = CollectionId::random();
        let snippet = SnippetId::random();

        assert!(store.add_member(&collection, &snippet).await.expect("add"));
        assert!(!store.add_member(&collection, &snippet).await.expect("add"));
        assert!(store.remove_member(&collection, &snippet).await.expect("remove"));
        assert!(!store.remove_member(&collection, &snippet).await.expect("remove"));
    }

    #[tokio::test]
    async fn anonymous_listings_exclude_private_snippets() {
        let store = MemoryStore::new();
        let owner = UserId::random();
        let public = make_snippet(owner, "Public", true);
        let public_id = public.id;
        let private = make_snippet(owner, "Private", false);
        let private_id = private.id;
        SnippetRepository::insert(&store, public).await.expect("insert");
        SnippetRepository::insert(&store, private).await.expect("insert");

        let anonymous = SnippetRepository::list(
            &store,
            &query(SnippetCriteria::default(), ReadScope::Public),
        )
        .await
        .expect("list");
        assert_eq!(anonymous.items.len(), 1);
        assert_eq!(anonymous.items[0].id, public_id);

        let owning = SnippetRepository::list(
            &store,
            &query(SnippetCriteria::default(), ReadScope::PublicOrOwner(owner)),
        )
        .await
        .expect("list");
        let ids: Vec<SnippetId> = owning.items.iter().map(|s| s.id).collect();
        assert!(ids.contains(&private_id));
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn cursor_pages_walk_the_listing_without_gaps_or_overlap() {
        let store = MemoryStore::new();
        let seeded = seed_snippets(&store, UserId::random(), 25).await;

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let criteria = SnippetCriteria {
                cursor: cursor.clone(),
                page_size: Some(10),
                ..SnippetCriteria::default()
            };
            let q = query(criteria, ReadScope::Public);
            let slice = SnippetRepository::list(&store, &q).await.expect("list");
            seen.extend(slice.items.iter().map(|s| s.id));
            if !slice.has_more {
                break;
            }
            let last = slice.items.last().expect("non-empty page");
            cursor = Some(SnippetCursor::after(last).encode());
        }

        assert_eq!(seen.len(), seeded.len());
        let unique: HashSet<SnippetId> = seen.iter().copied().collect();
        assert_eq!(unique.len(), seeded.len());
    }

    #[tokio::test]
    async fn backward_cursors_recover_the_preceding_page() {
        let store = MemoryStore::new();
        seed_snippets(&store, UserId::random(), 6).await;

        let page = |cursor: Option<String>| SnippetCriteria {
            cursor,
            page_size: Some(2),
            ..SnippetCriteria::default()
        };
        let first = SnippetRepository::list(&store, &query(page(None), ReadScope::Public))
            .await
            .expect("list");
        let after_first = SnippetCursor::after(first.items.last().expect("full page")).encode();
        let second = SnippetRepository::list(
            &store,
            &query(page(Some(after_first)), ReadScope::Public),
        )
        .await
        .expect("list");

        let before_second =
            SnippetCursor::before(second.items.first().expect("full page")).encode();
        let walked_back = SnippetRepository::list(
            &store,
            &query(page(Some(before_second)), ReadScope::Public),
        )
        .await
        .expect("list");
        assert_eq!(walked_back.items, first.items);
        // Nothing precedes the first page.
        assert!(!walked_back.has_more);

        let after_second =
            SnippetCursor::after(second.items.last().expect("full page")).encode();
        let third = SnippetRepository::list(
            &store,
            &query(page(Some(after_second)), ReadScope::Public),
        )
        .await
        .expect("list");
        let before_third =
            SnippetCursor::before(third.items.first().expect("full page")).encode();
        let walked_back = SnippetRepository::list(
            &store,
            &query(page(Some(before_third)), ReadScope::Public),
        )
        .await
        .expect("list");
        assert_eq!(walked_back.items, second.items);
        assert!(walked_back.has_more);
    }

    #[tokio::test]
    async fn default_order_is_newest_first() {
        let store = MemoryStore::new();
        seed_snippets(&store, UserId::random(), 3).await;

        let slice = SnippetRepository::list(
            &store,
            &query(SnippetCriteria::default(), ReadScope::Public),
        )
        .await
        .expect("list");
        let titles: Vec<&str> = slice.items.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Snippet 2", "Snippet 1", "Snippet 0"]);
    }

    #[tokio::test]
    async fn like_ordering_sorts_by_count() {
        let store = MemoryStore::new();
        let owner = UserId::random();
        let ids = seed_snippets(&store, owner, 3).await;
        store.toggle_like(&UserId::random(), &ids[0]).await.expect("like");
        store.toggle_like(&UserId::random(), &ids[0]).await.expect("like");
        store.toggle_like(&UserId::random(), &ids[1]).await.expect("like");

        let criteria = SnippetCriteria {
            ordering: Some("-likes".into()),
            ..SnippetCriteria::default()
        };
        let slice = SnippetRepository::list(&store, &query(criteria, ReadScope::Public))
            .await
            .expect("list");
        let listed: Vec<SnippetId> = slice.items.iter().map(|s| s.id).collect();
        assert_eq!(listed[0], ids[0]);
        assert_eq!(listed[1], ids[1]);
    }

    #[tokio::test]
    async fn owner_username_filter_is_case_insensitive() {
        let store = MemoryStore::new();
        let ada = make_user("Ada");
        let ada_id = ada.id;
        UserRepository::insert(&store, ada).await.expect("insert");
        let snippet = make_snippet(ada_id, "Hers", true);
        SnippetRepository::insert(&store, snippet).await.expect("insert");
        let other = make_snippet(UserId::random(), "Not hers", true);
        SnippetRepository::insert(&store, other).await.expect("insert");

        let criteria = SnippetCriteria {
            owner_username: Some("aDa".into()),
            ..SnippetCriteria::default()
        };
        let slice = SnippetRepository::list(&store, &query(criteria, ReadScope::Public))
            .await
            .expect("list");
        assert_eq!(slice.items.len(), 1);
        assert_eq!(slice.items[0].owner, ada_id);

        let criteria = SnippetCriteria {
            owner_username: Some("nobody".into()),
            ..SnippetCriteria::default()
        };
        let slice = SnippetRepository::list(&store, &query(criteria, ReadScope::Public))
            .await
            .expect("list");
        assert!(slice.items.is_empty());
    }

    #[tokio::test]
    async fn user_search_matches_username_and_location() {
        let store = MemoryStore::new();
        let mut ada = make_user("ada");
        ada.location = "London".into();
        let mut grace = make_user("grace");
        grace.location = "New York".into();
        UserRepository::insert(&store, ada).await.expect("insert");
        UserRepository::insert(&store, grace).await.expect("insert");

        let criteria = UserCriteria {
            search: Some("london".into()),
            ..UserCriteria::default()
        };
        let listed = UserRepository::list(&store, &criteria.compose(ReadScope::Public))
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].username.as_ref(), "ada");
    }

    #[tokio::test]
    async fn private_profiles_are_listed_only_for_themselves() {
        let store = MemoryStore::new();
        let mut hidden = make_user("hidden");
        hidden.is_public = false;
        let hidden_id = hidden.id;
        UserRepository::insert(&store, hidden).await.expect("insert");
        UserRepository::insert(&store, make_user("visible"))
            .await
            .expect("insert");

        let anonymous = UserRepository::list(
            &store,
            &UserCriteria::default().compose(ReadScope::Public),
        )
        .await
        .expect("list");
        assert_eq!(anonymous.len(), 1);

        let own = UserRepository::list(
            &store,
            &UserCriteria::default().compose(ReadScope::PublicOrOwner(hidden_id)),
        )
        .await
        .expect("list");
        assert_eq!(own.len(), 2);
    }
}
