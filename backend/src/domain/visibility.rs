//! Pure visibility decisions over (caller, target, intent).
//!
//! Policy lives here as plain functions rather than per-endpoint permission
//! objects, so every service consults the same rules and the store never
//! needs to know about callers. Two classification rules hold everywhere:
//! an id that exists but is unreadable yields `Forbidden`; `NotFound` is
//! reserved for ids that are absent from the store entirely.

use serde::{Deserialize, Serialize};

use crate::domain::collection::Collection;
use crate::domain::error::Error;
use crate::domain::identity::Caller;
use crate::domain::snippet::Snippet;
use crate::domain::user::{User, UserId};

/// Operation class a caller wants to perform on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Write,
}

/// Anything guarded by an owner and a public flag.
pub trait Visible {
    fn owner_id(&self) -> &UserId;
    fn is_public(&self) -> bool;
}

impl Visible for Snippet {
    fn owner_id(&self) -> &UserId {
        &self.owner
    }

    fn is_public(&self) -> bool {
        self.is_public
    }
}

impl Visible for Collection {
    fn owner_id(&self) -> &UserId {
        &self.owner
    }

    fn is_public(&self) -> bool {
        self.is_public
    }
}

// A user guards itself: the profile's owner is the user.
impl Visible for User {
    fn owner_id(&self) -> &UserId {
        &self.id
    }

    fn is_public(&self) -> bool {
        self.is_public
    }
}

/// Decide whether `caller` may perform `intent` on an owned target.
///
/// Ordered most specific rule first: ownership always wins; the public
/// flag only ever grants reads.
pub fn allows(caller: &Caller, target: &impl Visible, intent: Intent) -> bool {
    if caller.owns(target.owner_id()) {
        return true;
    }
    matches!(intent, Intent::Read) && target.is_public()
}

/// [`allows`] as a guard, failing with `Forbidden` and a message naming
/// the resource kind.
pub fn ensure(
    caller: &Caller,
    target: &impl Visible,
    intent: Intent,
    kind: &str,
) -> Result<(), Error> {
    if allows(caller, target, intent) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "you do not have permission to access this {kind}"
        )))
    }
}

/// List-level projection of the read rule, handed to the store as a
/// filter. The store applies it as data; it never inspects callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadScope {
    /// Anonymous callers see only public records.
    Public,
    /// Authenticated callers additionally see everything they own.
    PublicOrOwner(UserId),
}

impl ReadScope {
    pub fn for_caller(caller: &Caller) -> Self {
        match caller.user_id() {
            None => Self::Public,
            Some(id) => Self::PublicOrOwner(*id),
        }
    }

    /// Whether a record is admitted by this scope.
    pub fn admits(&self, target: &impl Visible) -> bool {
        match self {
            Self::Public => target.is_public(),
            Self::PublicOrOwner(id) => target.is_public() || target.owner_id() == id,
        }
    }
}
