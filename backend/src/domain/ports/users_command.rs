//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::user::{UserId, UserProfileUpdate, UserSummary};

/// Mutation surface over user profiles. Both operations are self-only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    async fn update_profile(
        &self,
        caller: Caller,
        id: UserId,
        payload: UserProfileUpdate,
    ) -> Result<UserSummary, Error>;

    /// Delete the caller's own account, cascading over everything owned.
    async fn delete(&self, caller: Caller, id: UserId) -> Result<(), Error>;
}
