//! Caller identity passed explicitly into every domain operation.
//!
//! There is no ambient "current user": handlers resolve the caller once at
//! the edge and thread it through. Anonymous callers are a first-class
//! value, not an absent parameter.

use crate::domain::Error;
use crate::domain::user::UserId;

/// The identity on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// No authenticated identity was presented.
    Anonymous,
    /// A verified user identity supplied by the external auth layer.
    Authenticated(UserId),
}

impl Caller {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(id),
        }
    }

    /// Require an authenticated identity or fail with `Unauthorized`.
    pub fn require_user_id(&self) -> Result<&UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }

    /// Whether this caller is the given owner. Anonymous callers own
    /// nothing.
    pub fn owns(&self, owner: &UserId) -> bool {
        self.user_id() == Some(owner)
    }
}
