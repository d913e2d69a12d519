//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::query::UserQuery;
use crate::domain::user::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Port for user storage and retrieval.
///
/// Lookups return `None` for absent ids; existence is never an error at
/// this seam. Deleting a user cascades over everything the user owns,
/// inside one adapter-level transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> Result<(), UserRepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    async fn update(&self, user: User) -> Result<(), UserRepositoryError>;

    /// Delete the user and cascade over owned snippets, owned collections,
    /// and every like or membership edge touching them. Returns `false`
    /// when the id is absent.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// List users admitted by the query's scope, newest first.
    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, UserRepositoryError>;
}
