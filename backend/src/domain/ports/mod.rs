//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod collection_repository;
mod collections_command;
mod collections_query;
mod snippet_repository;
mod snippets_command;
mod snippets_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{CollectionRepository, CollectionRepositoryError};
#[cfg(test)]
pub use collections_command::MockCollectionsCommand;
pub use collections_command::CollectionsCommand;
#[cfg(test)]
pub use collections_query::MockCollectionsQuery;
pub use collections_query::CollectionsQuery;
#[cfg(test)]
pub use snippet_repository::MockSnippetRepository;
pub use snippet_repository::{SnippetRepository, SnippetRepositoryError};
#[cfg(test)]
pub use snippets_command::MockSnippetsCommand;
pub use snippets_command::SnippetsCommand;
#[cfg(test)]
pub use snippets_query::MockSnippetsQuery;
pub use snippets_query::SnippetsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
