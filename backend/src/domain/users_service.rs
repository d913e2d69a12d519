//! User domain service.
//!
//! Profiles follow the same ownership rule as owned records: a user always
//! reads and writes their own profile, other callers read it only while it
//! is public. Account deletion cascades inside the repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::NumberedPage;
use tracing::info;

use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::ports::{
    SnippetRepository, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::query::UserCriteria;
use crate::domain::snippet::SnippetView;
use crate::domain::snippets_service::{map_snippet_error, map_user_error};
use crate::domain::user::{User, UserId, UserProfileUpdate, UserSummary};
use crate::domain::visibility::{self, Intent, ReadScope};

/// User service implementing the driving ports.
#[derive(Clone)]
pub struct UsersService<U, S> {
    users: Arc<U>,
    snippets: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<U, S> UsersService<U, S> {
    pub fn new(users: Arc<U>, snippets: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            snippets,
            clock,
        }
    }
}

fn user_not_found() -> Error {
    Error::not_found("user not found")
}

impl<U, S> UsersService<U, S>
where
    U: UserRepository,
    S: SnippetRepository,
{
    async fn fetch(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)
    }
}

#[async_trait]
impl<U, S> UsersQuery for UsersService<U, S>
where
    U: UserRepository,
    S: SnippetRepository,
{
    async fn list(
        &self,
        caller: Caller,
        criteria: UserCriteria,
    ) -> Result<NumberedPage<UserSummary>, Error> {
        let scope = ReadScope::for_caller(&caller);
        let page = criteria.page();
        let page_size = criteria.page_size();
        let query = criteria.compose(scope);
        let users = self.users.list(&query).await.map_err(map_user_error)?;
        let summaries = users.iter().map(UserSummary::from).collect();
        Ok(NumberedPage::paginate(summaries, page, page_size))
    }

    async fn get(&self, caller: Caller, id: UserId) -> Result<UserSummary, Error> {
        let user = self.fetch(&id).await?;
        visibility::ensure(&caller, &user, Intent::Read, "profile")?;
        Ok(UserSummary::from(&user))
    }

    async fn snippets_of(
        &self,
        caller: Caller,
        id: UserId,
    ) -> Result<Vec<SnippetView>, Error> {
        let user = self.fetch(&id).await?;
        visibility::ensure(&caller, &user, Intent::Read, "profile")?;
        let scope = ReadScope::for_caller(&caller);
        let snippets = self
            .snippets
            .list_owned(&id, &scope)
            .await
            .map_err(map_snippet_error)?;
        let owner = UserSummary::from(&user);
        let mut views = Vec::with_capacity(snippets.len());
        for snippet in snippets {
            let likes_count = self
                .snippets
                .like_count(&snippet.id)
                .await
                .map_err(map_snippet_error)?;
            let is_liked = match caller.user_id() {
                None => false,
                Some(viewer) => self
                    .snippets
                    .is_liked(viewer, &snippet.id)
                    .await
                    .map_err(map_snippet_error)?,
            };
            views.push(SnippetView::assemble(
                snippet,
                owner.clone(),
                likes_count,
                is_liked,
            ));
        }
        Ok(views)
    }
}

#[async_trait]
impl<U, S> UsersCommand for UsersService<U, S>
where
    U: UserRepository,
    S: SnippetRepository,
{
    async fn update_profile(
        &self,
        caller: Caller,
        id: UserId,
        payload: UserProfileUpdate,
    ) -> Result<UserSummary, Error> {
        let mut user = self.fetch(&id).await?;
        visibility::ensure(&caller, &user, Intent::Write, "profile")?;
        payload.validate()?;
        payload.apply(&mut user, self.clock.utc());
        self.users
            .update(user.clone())
            .await
            .map_err(map_user_error)?;
        info!(user = %id, "profile updated");
        Ok(UserSummary::from(&user))
    }

    async fn delete(&self, caller: Caller, id: UserId) -> Result<(), Error> {
        let user = self.fetch(&id).await?;
        visibility::ensure(&caller, &user, Intent::Write, "profile")?;
        let removed = self.users.delete(&id).await.map_err(map_user_error)?;
        if !removed {
            return Err(user_not_found());
        }
        info!(user = %id, "account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockSnippetRepository, MockUserRepository};
    use crate::domain::user::{EmailAddress, Username};
    use chrono::Utc;
    use mockable::DefaultClock;

    fn make_service(
        users: MockUserRepository,
        snippets: MockSnippetRepository,
    ) -> UsersService<MockUserRepository, MockSnippetRepository> {
        UsersService::new(Arc::new(users), Arc::new(snippets), Arc::new(DefaultClock))
    }

    fn make_user(id: UserId, is_public: bool) -> User {
        let mut user = User::new(
            id,
            Username::new("ada").expect("valid"),
            EmailAddress::new("ada@example.org").expect("valid"),
            Utc::now(),
        );
        user.is_public = is_public;
        user
    }

    #[tokio::test]
    async fn private_profiles_stay_readable_to_their_owner() {
        let id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(make_user(id, false))));

        let service = make_service(users, MockSnippetRepository::new());
        let summary = service
            .get(Caller::Authenticated(id), id)
            .await
            .expect("self read");
        assert_eq!(summary.id, id);
    }

    #[tokio::test]
    async fn private_profiles_are_forbidden_to_others() {
        let id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(make_user(id, false))));

        let service = make_service(users, MockSnippetRepository::new());
        let error = service
            .get(Caller::Authenticated(UserId::random()), id)
            .await
            .expect_err("private profile");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn profile_updates_are_self_only() {
        let id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(make_user(id, true))));

        let service = make_service(users, MockSnippetRepository::new());
        let error = service
            .update_profile(
                Caller::Authenticated(UserId::random()),
                id,
                UserProfileUpdate::default(),
            )
            .await
            .expect_err("not the profile owner");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn update_profile_applies_and_persists() {
        let id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(make_user(id, true))));
        users
            .expect_update()
            .withf(|user: &User| user.bio == "countess of lovelace")
            .times(1)
            .return_once(|_| Ok(()));

        let service = make_service(users, MockSnippetRepository::new());
        let payload = UserProfileUpdate {
            bio: Some("countess of lovelace".into()),
            ..UserProfileUpdate::default()
        };
        let summary = service
            .update_profile(Caller::Authenticated(id), id, payload)
            .await
            .expect("self update");
        assert_eq!(summary.bio, "countess of lovelace");
    }

    #[tokio::test]
    async fn delete_is_self_only() {
        let id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(make_user(id, true))));

        let service = make_service(users, MockSnippetRepository::new());
        let error = service
            .delete(Caller::Authenticated(UserId::random()), id)
            .await
            .expect_err("not the account owner");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn snippets_of_respects_both_profile_and_snippet_scope() {
        let id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(make_user(id, true))));
        let mut snippets = MockSnippetRepository::new();
        snippets
            .expect_list_owned()
            .withf(move |owner, scope| *owner == id && *scope == ReadScope::Public)
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));

        let service = make_service(users, snippets);
        let views = service
            .snippets_of(Caller::Anonymous, id)
            .await
            .expect("public profile");
        assert!(views.is_empty());
    }
}
