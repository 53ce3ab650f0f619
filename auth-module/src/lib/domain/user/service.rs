use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::domain::user::errors::AuthError;
use crate::domain::user::errors::UserError;
use crate::domain::user::errors::ValidationError;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::NewUserRecord;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserCriteria;
use crate::domain::user::ports::UserHooks;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::schemas::LoginRequest;
use crate::domain::user::schemas::RegisterRequest;
use crate::domain::user::schemas::RequestSchema;

/// Default create/find/login hooks over a user repository.
///
/// `S` and `L` select the registration and login schemas. Any schema that
/// validates into [`NewUser`] / [`Credentials`] can be swapped in without
/// touching the behavior.
pub struct DefaultUserHooks<R, S = RegisterRequest, L = LoginRequest>
where
    R: UserRepository,
{
    repository: Arc<R>,
    password_hasher: auth::PasswordHasher,
    // Verified against when the email is unknown, so both login failures
    // cost one Argon2 verification.
    decoy_hash: Arc<OnceCell<String>>,
    schemas: PhantomData<fn() -> (S, L)>,
}

const DECOY_PASSWORD: &str = "decoy-password-never-matches";

impl<R> DefaultUserHooks<R>
where
    R: UserRepository,
{
    /// Default hooks with the default schemas.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_schemas(repository)
    }
}

impl<R, S, L> DefaultUserHooks<R, S, L>
where
    R: UserRepository,
{
    /// Default hooks with host supplied schemas.
    ///
    /// ```ignore
    /// let hooks = DefaultUserHooks::<_, StrictRegisterRequest>::with_schemas(repository);
    /// ```
    pub fn with_schemas(repository: Arc<R>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
            decoy_hash: Arc::new(OnceCell::new()),
            schemas: PhantomData,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    // CPU bound, runs on the blocking pool.
    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let hasher = self.password_hasher;

        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, UserError> {
        let hasher = self.password_hasher;

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?
            .map_err(UserError::from)
    }

    /// Spend one verification on the decoy hash. The outcome is ignored.
    async fn verify_decoy(&self, password: String) {
        let hasher = self.password_hasher;
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| async move {
                tokio::task::spawn_blocking(move || hasher.hash(DECOY_PASSWORD))
                    .await
                    .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
                    .map_err(UserError::from)
            })
            .await;

        match decoy {
            Ok(decoy) => {
                let _ = self.verify_password(password, decoy.clone()).await;
            }
            Err(e) => tracing::warn!(error = %e, "Decoy hash unavailable"),
        }
    }
}

impl<R, S, L> Clone for DefaultUserHooks<R, S, L>
where
    R: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            password_hasher: self.password_hasher,
            decoy_hash: Arc::clone(&self.decoy_hash),
            schemas: PhantomData,
        }
    }
}

#[async_trait]
impl<R, S, L> UserHooks for DefaultUserHooks<R, S, L>
where
    R: UserRepository,
    S: RequestSchema<Validated = NewUser>,
    L: RequestSchema<Validated = Credentials>,
{
    type Registration = S;
    type Login = L;

    async fn create_user(&self, input: NewUser) -> Result<User, UserError> {
        if self.find_user(&input.criteria()).await?.is_some() {
            tracing::info!(email = %input.email, "Registration rejected: user already exists");
            return Err(UserError::AlreadyExists(input.email.to_string()));
        }

        let email = input.email;
        let password_hash = self.hash_password(input.password).await?;

        // The unique index on email still rejects a concurrent duplicate here.
        let user = self
            .repository
            .create(NewUserRecord {
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(user)
    }

    async fn find_user(&self, criteria: &UserCriteria) -> Result<Option<User>, UserError> {
        let email = criteria
            .email
            .as_ref()
            .ok_or_else(|| ValidationError::missing("email"))?;

        self.repository.find_by_email(email).await
    }

    async fn login_user(&self, input: Credentials) -> Result<User, UserError> {
        let user = match self.find_user(&input.criteria()).await? {
            Some(user) => user,
            None => {
                self.verify_decoy(input.password).await;
                return Err(AuthError::NotFound.into());
            }
        };

        if !self
            .verify_password(input.password, user.password_hash.clone())
            .await?
        {
            return Err(AuthError::BadPassword.into());
        }

        Ok(user)
    }
}
