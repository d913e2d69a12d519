//! Domain-level error classification.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; the domain only records the failure category, a human-readable
//! message, and optional structured details (such as the list of failing
//! payload fields).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Stable machine-readable error code describing the failure category.
///
/// Every classification is terminal: none of them is retried inside the
/// domain, they are returned to the caller layer as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The payload is malformed or fails field validation.
    InvalidRequest,
    /// An authenticated caller is required but absent.
    Unauthorized,
    /// The caller is identified but lacks permission for this entity.
    Forbidden,
    /// No entity with this id exists in the store at all.
    NotFound,
    /// The operation would create a relation edge or record that policy
    /// treats as a conflict, such as a second collection-membership add.
    Conflict,
    /// An unexpected internal fault. The message is redacted before it
    /// reaches a client.
    InternalError,
}

/// One failing field in a rejected payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error, panicking if the message is blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        assert!(
            !message.trim().is_empty(),
            "error messages must not be blank"
        );
        Self {
            code,
            message,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Build an [`ErrorCode::InvalidRequest`] from collected field
    /// violations, carrying every failing field (not just the first).
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        debug_assert!(!violations.is_empty(), "validation errors need fields");
        Self::invalid_request("validation failed").with_details(json!({ "fields": violations }))
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_failing_field() {
        let err = Error::validation(vec![
            FieldViolation::new("title", "too short"),
            FieldViolation::new("language", "unknown language"),
        ]);
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let fields = err
            .details()
            .and_then(|d| d.get("fields"))
            .and_then(Value::as_array)
            .expect("fields detail");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "title");
        assert_eq!(fields[1]["field"], "language");
    }

    #[test]
    fn serialises_code_as_snake_case() {
        let err = Error::not_found("snippet not found");
        let value = serde_json::to_value(&err).expect("serialisable");
        assert_eq!(value["code"], "not_found");
        assert_eq!(value["message"], "snippet not found");
        assert!(value.get("details").is_none());
    }

    #[test]
    #[should_panic(expected = "must not be blank")]
    fn blank_messages_are_rejected() {
        let _ = Error::internal("   ");
    }
}
