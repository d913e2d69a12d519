//! User entity and validated profile primitives.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::{Error, FieldViolation};

/// Maximum length of a username, matching the registration flow.
pub const USERNAME_MAX: usize = 150;
/// Maximum length of the short biography field.
pub const BIO_MAX: usize = 160;
/// Maximum length of the free-form location field.
pub const LOCATION_MAX: usize = 100;
/// Maximum length of the avatar URL.
pub const AVATAR_URL_MAX: usize = 200;

/// Stable user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors raised by the user newtypes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {USERNAME_MAX} characters")]
    UsernameTooLong,
    #[error("username may only contain letters, digits and @/./+/-/_")]
    UsernameInvalidCharacters,
    #[error("email address must not be empty")]
    EmptyEmail,
    #[error("email address must contain '@'")]
    EmailMissingAt,
}

/// Unique handle a user registers under.
///
/// ## Invariants
/// - Non-empty, at most [`USERNAME_MAX`] characters.
/// - Restricted to word characters plus `@`, `.`, `+`, `-` (the charset
///   the registration flow enforces).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if raw.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong);
        }
        let allowed =
            |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
        if !raw.chars().all(allowed) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered email address.
///
/// The registration flow owns full address verification; this type only
/// enforces the structural minimum so obviously broken records cannot be
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !raw.contains('@') {
            return Err(UserValidationError::EmailMissingAt);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user.
///
/// Users are created by the external registration flow; inside the domain
/// they are only listed, read, profile-updated by themselves, and deleted
/// by themselves (with cascade over everything they own).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub bio: String,
    pub location: String,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar_url: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user record with empty profile fields.
    ///
    /// `is_public` defaults to true; profile fields are filled in later via
    /// [`UserProfileUpdate`].
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            bio: String::new(),
            location: String::new(),
            date_of_birth: None,
            avatar_url: String::new(),
            is_public: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public projection of a user, embedded in snippet and collection views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            is_public: user.is_public,
            created_at: user.created_at,
        }
    }
}

/// Partial profile update. Username and email are registration-owned and
/// deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfileUpdate {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub avatar_url: Option<String>,
    pub is_public: Option<bool>,
}

impl UserProfileUpdate {
    /// Validate only the supplied fields, collecting every violation.
    pub fn validate(&self) -> Result<(), Error> {
        let mut violations = Vec::new();
        if self.bio.as_ref().is_some_and(|bio| bio.chars().count() > BIO_MAX) {
            violations.push(FieldViolation::new(
                "bio",
                format!("must be at most {BIO_MAX} characters"),
            ));
        }
        if self
            .location
            .as_ref()
            .is_some_and(|location| location.chars().count() > LOCATION_MAX)
        {
            violations.push(FieldViolation::new(
                "location",
                format!("must be at most {LOCATION_MAX} characters"),
            ));
        }
        if self
            .avatar_url
            .as_ref()
            .is_some_and(|url| url.chars().count() > AVATAR_URL_MAX)
        {
            violations.push(FieldViolation::new(
                "avatarUrl",
                format!("must be at most {AVATAR_URL_MAX} characters"),
            ));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(violations))
        }
    }

    /// Apply the supplied fields and bump the update timestamp.
    pub fn apply(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
        if let Some(location) = &self.location {
            user.location = location.clone();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(avatar_url) = &self.avatar_url {
            user.avatar_url = avatar_url.clone();
        }
        if let Some(is_public) = self.is_public {
            user.is_public = is_public;
        }
        user.updated_at = now;
    }
}
