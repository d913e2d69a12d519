//! Driving port for user reads.

use async_trait::async_trait;
use pagination::NumberedPage;

use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::query::UserCriteria;
use crate::domain::snippet::SnippetView;
use crate::domain::user::{UserId, UserSummary};

/// Read surface over user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    async fn list(
        &self,
        caller: Caller,
        criteria: UserCriteria,
    ) -> Result<NumberedPage<UserSummary>, Error>;

    async fn get(&self, caller: Caller, id: UserId) -> Result<UserSummary, Error>;

    /// Snippets owned by a user whose profile the caller may read, each
    /// additionally filtered through the caller's snippet read scope.
    async fn snippets_of(
        &self,
        caller: Caller,
        id: UserId,
    ) -> Result<Vec<SnippetView>, Error>;
}
