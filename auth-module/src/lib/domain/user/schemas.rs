use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::user::errors::FieldViolation;
use crate::domain::user::errors::ValidationError;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;

/// Declared shape of a request body.
///
/// The body is deserialized into the schema type, then validated once into
/// a typed value that the hooks consume.
pub trait RequestSchema: DeserializeOwned + Send + 'static {
    type Validated: Send + 'static;

    /// # Errors
    /// * `ValidationError` - Listing every offending field
    fn validate(self) -> Result<Self::Validated, ValidationError>;
}

/// Default registration payload: `{"email": ..., "password": ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RequestSchema for RegisterRequest {
    type Validated = NewUser;

    fn validate(self) -> Result<NewUser, ValidationError> {
        let mut violations = Vec::new();

        let email = required(&mut violations, "email", self.email)
            .and_then(|raw| collect(&mut violations, "email", EmailAddress::new(raw)));
        let password = required(&mut violations, "password", self.password)
            .and_then(|raw| collect(&mut violations, "password", Password::new(raw)));

        match (email, password) {
            (Some(email), Some(password)) if violations.is_empty() => {
                Ok(NewUser::new(email, password))
            }
            _ => Err(ValidationError::new(violations)),
        }
    }
}

/// Default login payload: `{"email": ..., "password": ...}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RequestSchema for LoginRequest {
    type Validated = Credentials;

    fn validate(self) -> Result<Credentials, ValidationError> {
        let mut violations = Vec::new();

        let email = required(&mut violations, "email", self.email)
            .and_then(|raw| collect(&mut violations, "email", EmailAddress::new(raw)));
        let password = required(&mut violations, "password", self.password);

        match (email, password) {
            (Some(email), Some(password)) if violations.is_empty() => {
                Ok(Credentials::new(email, password))
            }
            _ => Err(ValidationError::new(violations)),
        }
    }
}

/// Record a violation when the field is absent or empty.
pub fn required(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: Option<String>,
) -> Option<String> {
    match value {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            violations.push(FieldViolation::missing(field));
            None
        }
    }
}

/// Record a violation when a value type rejects its input.
pub fn collect<T, E: ToString>(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    result: Result<T, E>,
) -> Option<T> {
    result
        .map_err(|e| violations.push(FieldViolation::new(field, e)))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: Option<&str>, password: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_register_valid() {
        let new_user = register(Some("a@b.com"), Some("secret1")).validate().unwrap();

        assert_eq!(new_user.email.as_str(), "a@b.com");
        assert_eq!(new_user.password.as_str(), "secret1");
    }

    #[test]
    fn test_register_short_password() {
        let err = register(Some("a@b.com"), Some("12345")).validate().unwrap_err();

        assert_eq!(err.violations.len(), 1);
        assert!(err.has_field("password"));
        assert!(err.violations[0].message.contains("at least 6"));
    }

    #[test]
    fn test_register_reports_every_field() {
        let err = register(Some("nope"), None).validate().unwrap_err();

        assert!(err.has_field("email"));
        assert!(err.has_field("password"));
    }

    #[test]
    fn test_register_missing_email() {
        let err = register(None, Some("secret1")).validate().unwrap_err();

        assert_eq!(err, ValidationError::missing("email"));
    }

    #[test]
    fn test_register_deserializes_partial_body() {
        let body: RegisterRequest = serde_json::from_str(r#"{"password":"secret1"}"#).unwrap();
        assert!(body.validate().unwrap_err().has_field("email"));
    }

    #[test]
    fn test_login_does_not_apply_password_policy() {
        let credentials = LoginRequest {
            email: Some("a@b.com".to_string()),
            password: Some("x".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(credentials.password, "x");
    }

    #[test]
    fn test_login_requires_both_fields() {
        let err = LoginRequest::default().validate().unwrap_err();

        assert!(err.has_field("email"));
        assert!(err.has_field("password"));
    }
}
