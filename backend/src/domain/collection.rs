//! Collection entity and payload validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::FieldViolation;
use crate::domain::snippet::SnippetView;
use crate::domain::user::{UserId, UserSummary};

/// Minimum collection name length.
pub const NAME_MIN: usize = 3;
/// Maximum collection name length.
pub const NAME_MAX: usize = 200;
/// Maximum collection description length.
pub const DESCRIPTION_MAX: usize = 1000;

/// Stable collection identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CollectionId(Uuid);

impl CollectionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for CollectionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named grouping of snippets.
///
/// ## Invariants
/// - Exactly one owner; deleting the owner deletes the collection (but
///   never its member snippets).
/// - Membership is a set: no duplicate edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: String,
    pub owner: UserId,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn name_violation(name: &str) -> Option<FieldViolation> {
    let length = name.chars().count();
    if length < NAME_MIN {
        Some(FieldViolation::new(
            "name",
            format!("must be at least {NAME_MIN} characters"),
        ))
    } else if length > NAME_MAX {
        Some(FieldViolation::new(
            "name",
            format!("must be at most {NAME_MAX} characters"),
        ))
    } else {
        None
    }
}

fn description_violation(description: &str) -> Option<FieldViolation> {
    (description.chars().count() > DESCRIPTION_MAX).then(|| {
        FieldViolation::new(
            "description",
            format!("must be at most {DESCRIPTION_MAX} characters"),
        )
    })
}

fn default_is_public() -> bool {
    true
}

/// Create payload for a collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollection {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

impl NewCollection {
    /// Validate the whole payload, reporting every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        violations.extend(name_violation(&self.name));
        violations.extend(description_violation(&self.description));
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Partial update payload for a collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl CollectionUpdate {
    /// Validate only the supplied fields.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if let Some(name) = &self.name {
            violations.extend(name_violation(name));
        }
        if let Some(description) = &self.description {
            violations.extend(description_violation(description));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Apply the supplied fields and bump the update timestamp.
    pub fn apply(&self, collection: &mut Collection, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            collection.name = name.clone();
        }
        if let Some(description) = &self.description {
            collection.description = description.clone();
        }
        if let Some(is_public) = self.is_public {
            collection.is_public = is_public;
        }
        collection.updated_at = now;
    }
}

/// List projection of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionView {
    pub id: CollectionId,
    pub name: String,
    pub description: String,
    pub owner: UserSummary,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub snippet_count: usize,
}

impl CollectionView {
    pub fn assemble(collection: Collection, owner: UserSummary, snippet_count: usize) -> Self {
        Self {
            id: collection.id,
            name: collection.name,
            description: collection.description,
            owner,
            is_public: collection.is_public,
            created_at: collection.created_at,
            updated_at: collection.updated_at,
            snippet_count,
        }
    }
}

/// Detail projection: the collection plus its member snippets, already
/// filtered through the caller's read scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetail {
    #[serde(flatten)]
    pub collection: CollectionView,
    pub snippets: Vec<SnippetView>,
}
