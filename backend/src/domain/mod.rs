//! Domain entities, policy and services.
//!
//! Purpose: strongly typed entities, the visibility policy, and the
//! services implementing the driving ports. Serialisation contracts and
//! invariants are documented on each type.

pub mod collection;
pub mod collections_service;
pub mod error;
pub mod identity;
pub mod ports;
pub mod query;
pub mod snippet;
pub mod snippets_service;
pub mod user;
pub mod users_service;
pub mod visibility;

pub use self::collection::{
    Collection, CollectionDetail, CollectionId, CollectionUpdate, CollectionView, NewCollection,
};
pub use self::collections_service::CollectionsService;
pub use self::error::{Error, ErrorCode, FieldViolation};
pub use self::identity::Caller;
pub use self::query::{
    CollectionCriteria, SnippetCriteria, SnippetCursor, SnippetPage, SnippetSlice, UserCriteria,
};
pub use self::snippet::{
    Language, LikeState, LikeToggle, NewSnippet, Snippet, SnippetId, SnippetUpdate, SnippetView,
};
pub use self::snippets_service::SnippetsService;
pub use self::user::{
    EmailAddress, User, UserId, UserProfileUpdate, UserSummary, UserValidationError, Username,
};
pub use self::users_service::UsersService;
pub use self::visibility::{Intent, ReadScope, Visible};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
