//! Snippet entity, language enum and payload validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::FieldViolation;
use crate::domain::user::{UserId, UserSummary};

/// Minimum snippet title length.
pub const TITLE_MIN: usize = 3;
/// Maximum snippet title length.
pub const TITLE_MAX: usize = 200;
/// Maximum snippet description length.
pub const DESCRIPTION_MAX: usize = 1000;

/// Stable snippet identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SnippetId(Uuid);

impl SnippetId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for SnippetId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Languages a snippet may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Html,
    Css,
    Jsx,
    Typescript,
}

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Language; 6] = [
        Language::Python,
        Language::Javascript,
        Language::Html,
        Language::Css,
        Language::Jsx,
        Language::Typescript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Html => "html",
            Language::Css => "css",
            Language::Jsx => "jsx",
            Language::Typescript => "typescript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string names no supported language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a supported language")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .find(|language| language.as_str() == raw)
            .copied()
            .ok_or_else(|| UnknownLanguage(raw.to_owned()))
    }
}

/// A shared piece of code.
///
/// ## Invariants
/// - Exactly one owner; deleting the owner deletes the snippet.
/// - `title` within [`TITLE_MIN`]..=[`TITLE_MAX`], `code_content`
///   non-empty (enforced at the payload boundary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub code_content: String,
    pub language: Language,
    pub description: String,
    pub owner: UserId,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn title_violation(title: &str) -> Option<FieldViolation> {
    let length = title.chars().count();
    if length < TITLE_MIN {
        Some(FieldViolation::new(
            "title",
            format!("must be at least {TITLE_MIN} characters"),
        ))
    } else if length > TITLE_MAX {
        Some(FieldViolation::new(
            "title",
            format!("must be at most {TITLE_MAX} characters"),
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

fn language_violation(raw: &str) -> Result<Language, FieldViolation> {
    raw.parse().map_err(|_| {
        let supported = Language::ALL.map(|l| l.as_str()).join(", ");
        FieldViolation::new("language", format!("must be one of: {supported}"))
    })
}

fn default_is_public() -> bool {
    true
}

/// Create payload for a snippet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnippet {
    pub title: String,
    pub code_content: String,
    pub language: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

impl NewSnippet {
    /// Validate the whole payload, reporting every failing field. Returns
    /// the parsed language on success.
    pub fn validate(&self) -> Result<Language, Vec<FieldViolation>> {
        let mut violations = Vec::new();
        violations.extend(title_violation(&self.title));
        if self.code_content.is_empty() {
            violations.push(FieldViolation::new("codeContent", "must not be empty"));
        }
        violations.extend(description_violation(&self.description));
        match language_violation(&self.language) {
            Ok(language) if violations.is_empty() => Ok(language),
            Ok(_) => Err(violations),
            Err(violation) => {
                violations.push(violation);
                Err(violations)
            }
        }
    }
}

/// Partial update payload for a snippet. Only supplied fields are
/// validated and applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnippetUpdate {
    pub title: Option<String>,
    pub code_content: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl SnippetUpdate {
    /// Validate the supplied fields, returning the parsed language when
    /// one was supplied.
    pub fn validate(&self) -> Result<Option<Language>, Vec<FieldViolation>> {
        let mut violations = Vec::new();
        if let Some(title) = &self.title {
            violations.extend(title_violation(title));
        }
        if self.code_content.as_ref().is_some_and(String::is_empty) {
            violations.push(FieldViolation::new("codeContent", "must not be empty"));
        }
        if let Some(description) = &self.description {
            violations.extend(description_violation(description));
        }
        let language = match &self.language {
            None => None,
            Some(raw) => match language_violation(raw) {
                Ok(language) => Some(language),
                Err(violation) => {
                    violations.push(violation);
                    None
                }
            },
        };
        if violations.is_empty() {
            Ok(language)
        } else {
            Err(violations)
        }
    }

    /// Apply the supplied fields and bump the update timestamp.
    pub fn apply(&self, snippet: &mut Snippet, language: Option<Language>, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            snippet.title = title.clone();
        }
        if let Some(code_content) = &self.code_content {
            snippet.code_content = code_content.clone();
        }
        if let Some(language) = language {
            snippet.language = language;
        }
        if let Some(description) = &self.description {
            snippet.description = description.clone();
        }
        if let Some(is_public) = self.is_public {
            snippet.is_public = is_public;
        }
        snippet.updated_at = now;
    }
}

/// Caller-relative read projection of a snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetView {
    pub id: SnippetId,
    pub title: String,
    pub code_content: String,
    pub language: Language,
    pub description: String,
    pub owner: UserSummary,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes_count: usize,
    pub is_liked: bool,
}

impl SnippetView {
    pub fn assemble(
        snippet: Snippet,
        owner: UserSummary,
        likes_count: usize,
        is_liked: bool,
    ) -> Self {
        Self {
            id: snippet.id,
            title: snippet.title,
            code_content: snippet.code_content,
            language: snippet.language,
            description: snippet.description,
            owner,
            is_public: snippet.is_public,
            created_at: snippet.created_at,
            updated_at: snippet.updated_at,
            likes_count,
            is_liked,
        }
    }
}

/// The two stable states of a (user, snippet) like edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeState {
    Liked,
    Unliked,
}

/// Result of a like toggle: the new edge state and resulting count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub state: LikeState,
    pub likes_count: usize,
}
