use std::fmt;
use std::str::FromStr;

use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::PasswordPolicyError;

/// Registered user.
///
/// `password_hash` is the PHC digest, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Storage generated user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(UserId)
    }
}

/// Email address type, the natural key of a user.
///
/// Validates email format using RFC 5322 compliant parser. Stored and
/// compared exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for registration.
///
/// Never persisted and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        Self::with_min_length(password, Self::MIN_LENGTH)
    }

    /// Accept a password with a custom minimum length.
    ///
    /// Lets host schemas tighten the policy while reusing the type.
    pub fn with_min_length(password: String, min: usize) -> Result<Self, PasswordPolicyError> {
        let actual = password.chars().count();
        if actual < min {
            return Err(PasswordPolicyError::TooShort { min, actual });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password: Password,
}

impl NewUser {
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }

    /// Lookup criteria used for the duplicate check.
    pub fn criteria(&self) -> UserCriteria {
        UserCriteria::by_email(self.email.clone())
    }
}

/// Validated login input.
///
/// The password is not subject to the registration policy; whatever was
/// sent is checked against the stored hash.
#[derive(Clone)]
pub struct Credentials {
    pub email: EmailAddress,
    pub password: String,
}

impl Credentials {
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }

    pub fn criteria(&self) -> UserCriteria {
        UserCriteria::by_email(self.email.clone())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Fields a user lookup may be keyed on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCriteria {
    pub email: Option<EmailAddress>,
}

impl UserCriteria {
    pub fn by_email(email: EmailAddress) -> Self {
        Self { email: Some(email) }
    }
}

/// Row handed to a repository for insertion; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub email: EmailAddress,
    pub password_hash: String,
}
