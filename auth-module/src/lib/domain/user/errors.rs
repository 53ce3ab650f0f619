use serde::Serialize;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("value is not a valid email address: {0}")]
    InvalidFormat(String),
}

/// Error for Password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("ensure this value has at least {min} characters")]
    TooShort { min: usize, actual: usize },
}

/// One offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl ToString) -> Self {
        Self {
            field: field.into(),
            message: message.to_string(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "field required")
    }
}

/// Request payload failed its schema.
///
/// Lists every offending field, not only the first one found.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid input: {}", describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn single(field: impl Into<String>, message: impl ToString) -> Self {
        Self::new(vec![FieldViolation::new(field, message)])
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::missing(field)])
    }

    /// Whether `field` is among the violations.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Login failure.
///
/// The two kinds are kept apart for logs only; the HTTP layer reports both
/// with the same response.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    NotFound,

    #[error("Invalid password")]
    BadPassword,
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
