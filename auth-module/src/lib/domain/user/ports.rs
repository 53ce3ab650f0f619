use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUserRecord;
use crate::domain::user::models::User;
use crate::domain::user::models::UserCriteria;
use crate::domain::user::schemas::RequestSchema;

/// Validated registration input of a hooks implementation.
pub type RegistrationOf<H> = <<H as UserHooks>::Registration as RequestSchema>::Validated;

/// Validated login input of a hooks implementation.
pub type LoginOf<H> = <<H as UserHooks>::Login as RequestSchema>::Validated;

/// The three overridable operations behind the auth endpoints.
///
/// `DefaultUserHooks` implements them over any [`UserRepository`]. A host
/// that wants different behavior implements this trait itself, usually by
/// wrapping a `DefaultUserHooks` and delegating the hooks it keeps.
#[async_trait]
pub trait UserHooks: Send + Sync + 'static {
    /// Body accepted by `POST /register`.
    type Registration: RequestSchema;

    /// Body accepted by `POST /login`.
    type Login: RequestSchema;

    /// Register a new user.
    ///
    /// # Errors
    /// * `AlreadyExists` - A user with the same natural key exists
    /// * `Validation` - Input lacks a field the backend needs
    /// * `DatabaseError` - Storage operation failed
    async fn create_user(&self, input: RegistrationOf<Self>) -> Result<User, UserError>;

    /// Look up a user. Absence is `Ok(None)`, not an error.
    ///
    /// # Errors
    /// * `Validation` - Criteria lack the field the backend is keyed on
    /// * `DatabaseError` - Storage operation failed
    async fn find_user(&self, criteria: &UserCriteria) -> Result<Option<User>, UserError>;

    /// Check login credentials and return the matching user.
    ///
    /// # Errors
    /// * `Auth(NotFound)` - No such user
    /// * `Auth(BadPassword)` - Password does not match the stored hash
    async fn login_user(&self, input: LoginOf<Self>) -> Result<User, UserError>;
}

/// Persistence operations for users.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user and return it with its generated id.
    ///
    /// # Errors
    /// * `AlreadyExists` - Uniqueness constraint on email rejected the row
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUserRecord) -> Result<User, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}
