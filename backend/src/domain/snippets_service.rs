//! Snippet domain service.
//!
//! Implements the snippet driving ports over the snippet and user
//! repositories. Every operation derives the caller's scope first, so the
//! same record always classifies the same way: absent ids are not found,
//! unreadable ids are forbidden, and list results match the per-item read
//! rule exactly.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::ports::{
    SnippetRepository, SnippetRepositoryError, SnippetsCommand, SnippetsQuery, UserRepository,
    UserRepositoryError,
};
use crate::domain::query::{
    SnippetCriteria, SnippetCursor, SnippetOrderKey, SnippetPage, SnippetQuery, SnippetSlice,
};
use crate::domain::snippet::{
    LikeToggle, NewSnippet, Snippet, SnippetId, SnippetUpdate, SnippetView,
};
use crate::domain::user::UserSummary;
use crate::domain::visibility::{self, Intent, ReadScope};

/// Snippet service implementing the driving ports.
#[derive(Clone)]
pub struct SnippetsService<S, U> {
    snippets: Arc<S>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<S, U> SnippetsService<S, U> {
    pub fn new(snippets: Arc<S>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            snippets,
            users,
            clock,
        }
    }
}

pub(crate) fn map_snippet_error(error: SnippetRepositoryError) -> Error {
    Error::internal(format!("snippet repository error: {error}"))
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    Error::internal(format!("user repository error: {error}"))
}

fn snippet_not_found() -> Error {
    Error::not_found("snippet not found")
}

/// Continuation cursors for a listed slice.
///
/// Keyset positions only line up with the (created_at, id) order, so every
/// other ordering reports no continuation at all. A forward page past the
/// first can always step back to its boundary; a backward page can always
/// step forward across it.
fn cursor_metadata(
    query: &SnippetQuery,
    items: &[Snippet],
    has_more: bool,
) -> (Option<String>, Option<String>) {
    if query.order.key != SnippetOrderKey::CreatedAt {
        return (None, None);
    }
    let after_last = || items.last().map(|last| SnippetCursor::after(last).encode());
    let before_first = || {
        items
            .first()
            .map(|first| SnippetCursor::before(first).encode())
    };
    match &query.cursor {
        None => (has_more.then(after_last).flatten(), None),
        Some(cursor) if cursor.backward => {
            (after_last(), has_more.then(before_first).flatten())
        }
        Some(_) => (has_more.then(after_last).flatten(), before_first()),
    }
}

impl<S, U> SnippetsService<S, U>
where
    S: SnippetRepository,
    U: UserRepository,
{
    async fn fetch(&self, id: &SnippetId) -> Result<Snippet, Error> {
        self.snippets
            .find_by_id(id)
            .await
            .map_err(map_snippet_error)?
            .ok_or_else(snippet_not_found)
    }

    /// Assemble the caller-relative view of one snippet.
    pub(crate) async fn view(
        &self,
        caller: &Caller,
        snippet: Snippet,
    ) -> Result<SnippetView, Error> {
        let owner = self
            .users
            .find_by_id(&snippet.owner)
            .await
            .map_err(map_user_error)?
            // Cascade deletes make an orphaned snippet a store bug.
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

    async fn views(
        &self,
        caller: &Caller,
        snippets: Vec<Snippet>,
    ) -> Result<Vec<SnippetView>, Error> {
        let mut views = Vec::with_capacity(snippets.len());
        for snippet in snippets {
            views.push(self.view(caller, snippet).await?);
        }
        Ok(views)
    }
}

#[async_trait]
impl<S, U> SnippetsQuery for SnippetsService<S, U>
where
    S: SnippetRepository,
    U: UserRepository,
{
    async fn list(
        &self,
        caller: Caller,
        criteria: SnippetCriteria,
    ) -> Result<SnippetPage, Error> {
        let scope = ReadScope::for_caller(&caller);
        let query = criteria.compose(scope)?;
        let SnippetSlice { items, has_more } = self
            .snippets
            .list(&query)
            .await
            .map_err(map_snippet_error)?;
        let (next_cursor, previous_cursor) = cursor_metadata(&query, &items, has_more);
        let items = self.views(&caller, items).await?;
        Ok(SnippetPage {
            items,
            next_cursor,
            previous_cursor,
        })
    }

    async fn get(&self, caller: Caller, id: SnippetId) -> Result<SnippetView, Error> {
        let snippet = self.fetch(&id).await?;
        visibility::ensure(&caller, &snippet, Intent::Read, "snippet")?;
        self.view(&caller, snippet).await
    }
}

#[async_trait]
impl<S, U> SnippetsCommand for SnippetsService<S, U>
where
    S: SnippetRepository,
    U: UserRepository,
{
    async fn create(&self, caller: Caller, payload: NewSnippet) -> Result<SnippetView, Error> {
        let owner = *caller.require_user_id()?;
        let language = payload.validate().map_err(Error::validation)?;
        let now = self.clock.utc();
        let snippet = Snippet {
            id: SnippetId::random(),
            title: payload.title,
            code_content: payload.code_content,
            language,
            description: payload.description,
            owner,
            is_public: payload.is_public,
            created_at: now,
            updated_at: now,
        };
        self.snippets
            .insert(snippet.clone())
            .await
            .map_err(map_snippet_error)?;
        info!(snippet = %snippet.id, owner = %owner, "snippet created");
        self.view(&caller, snippet).await
    }

    async fn update(
        &self,
        caller: Caller,
        id: SnippetId,
        payload: SnippetUpdate,
    ) -> Result<SnippetView, Error> {
        let mut snippet = self.fetch(&id).await?;
        visibility::ensure(&caller, &snippet, Intent::Write, "snippet")?;
        let language = payload.validate().map_err(Error::validation)?;
        payload.apply(&mut snippet, language, self.clock.utc());
        self.snippets
            .update(snippet.clone())
            .await
            .map_err(map_snippet_error)?;
        info!(snippet = %id, "snippet updated");
        self.view(&caller, snippet).await
    }

    async fn delete(&self, caller: Caller, id: SnippetId) -> Result<(), Error> {
        let snippet = self.fetch(&id).await?;
        visibility::ensure(&caller, &snippet, Intent::Write, "snippet")?;
        let removed = self.snippets.delete(&id).await.map_err(map_snippet_error)?;
        if !removed {
            return Err(snippet_not_found());
        }
        info!(snippet = %id, "snippet deleted");
        Ok(())
    }

    async fn toggle_like(&self, caller: Caller, id: SnippetId) -> Result<LikeToggle, Error> {
        let user = *caller.require_user_id()?;
        let snippet = self.fetch(&id).await?;
        visibility::ensure(&caller, &snippet, Intent::Read, "snippet")?;
        let state = self
            .snippets
            .toggle_like(&user, &id)
            .await
            .map_err(map_snippet_error)?;
        let likes_count = self
            .snippets
            .like_count(&id)
            .await
            .map_err(map_snippet_error)?;
        info!(snippet = %id, user = %user, state = ?state, "like toggled");
        Ok(LikeToggle { state, likes_count })
    }
}
