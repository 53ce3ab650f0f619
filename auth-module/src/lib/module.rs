use std::sync::Arc;

use auth::Algorithm;
use auth::Authenticator;
use auth::TokenError;
use axum::Router;
use chrono::Duration;
use thiserror::Error;

use crate::config::AuthConfig;
use crate::config::DatabaseConfig;
use crate::domain::user::ports::UserHooks;
use crate::domain::user::service::DefaultUserHooks;
use crate::inbound::http::router::create_router;
use crate::inbound::http::router::AppState;
use crate::outbound::repositories::SqliteUserRepository;

pub use crate::inbound::http::router::AUTH_PREFIX;

/// Errors raised while building an [`AuthModule`].
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("A signing secret is required")]
    MissingSecret,

    #[error("Invalid token settings: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Token signing settings, fixed for the lifetime of the module.
#[derive(Clone)]
pub struct AuthSettings {
    secret: String,
    token_lifetime: Duration,
    algorithm: Algorithm,
}

impl AuthSettings {
    /// Settings with the default 15 minute lifetime and HS256.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime: Duration::minutes(auth::DEFAULT_TOKEN_LIFETIME_MINUTES),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn with_token_lifetime(mut self, token_lifetime: Duration) -> Self {
        self.token_lifetime = token_lifetime;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn authenticator(&self) -> Result<Authenticator, ModuleError> {
        if self.secret.trim().is_empty() {
            return Err(ModuleError::MissingSecret);
        }

        Ok(Authenticator::with_options(
            self.secret.as_bytes(),
            self.algorithm,
            self.token_lifetime,
        )?)
    }
}

impl TryFrom<&AuthConfig> for AuthSettings {
    type Error = ModuleError;

    fn try_from(config: &AuthConfig) -> Result<Self, Self::Error> {
        let token_lifetime = Duration::try_minutes(config.token_lifetime_minutes)
            .ok_or(TokenError::InvalidLifetime)?;

        Ok(AuthSettings::new(config.secret.clone())
            .with_token_lifetime(token_lifetime)
            .with_algorithm(auth::parse_algorithm(&config.algorithm)?))
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"**redacted**")
            .field("token_lifetime", &self.token_lifetime)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Pluggable authentication add-on for an axum application.
///
/// Built once at startup. Owns the token authenticator and the user hooks
/// and hands them to its handlers through router state.
///
/// ```ignore
/// let auth = AuthModule::connect(AuthSettings::new(secret), &config.database).await?;
/// let app = auth.mount(Router::new().route("/", get(hello)));
/// ```
pub struct AuthModule<H: UserHooks> {
    hooks: Arc<H>,
    authenticator: Arc<Authenticator>,
}

impl<H: UserHooks> AuthModule<H> {
    /// Build a module around a hooks implementation.
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    /// * `Token` - Algorithm or lifetime is not usable
    pub fn new(settings: AuthSettings, hooks: H) -> Result<Self, ModuleError> {
        let authenticator = settings.authenticator()?;

        tracing::info!(
            algorithm = ?settings.algorithm(),
            token_lifetime_secs = settings.token_lifetime().num_seconds(),
            "Auth module configured"
        );

        Ok(Self {
            hooks: Arc::new(hooks),
            authenticator: Arc::new(authenticator),
        })
    }

    pub fn hooks(&self) -> &Arc<H> {
        &self.hooks
    }

    /// Shared authenticator, for `require_auth` on host routes.
    pub fn authenticator(&self) -> Arc<Authenticator> {
        Arc::clone(&self.authenticator)
    }

    /// `/auth/ping`, `/auth/register` and `/auth/login`.
    pub fn router(&self) -> Router {
        create_router(AppState::new(
            Arc::clone(&self.hooks),
            Arc::clone(&self.authenticator),
        ))
    }

    /// Add the auth endpoints to a host application.
    pub fn mount(&self, app: Router) -> Router {
        app.merge(self.router())
    }
}

impl AuthModule<DefaultUserHooks<SqliteUserRepository>> {
    /// Build a module on the default SQLite backend.
    ///
    /// The `users` table is created before this returns, so the first
    /// request never races the schema.
    pub async fn connect(
        settings: AuthSettings,
        database: &DatabaseConfig,
    ) -> Result<Self, ModuleError> {
        let repository =
            SqliteUserRepository::connect(&database.url, database.max_connections).await?;
        tracing::info!(
            max_connections = database.max_connections,
            database = "sqlite",
            "Database connection pool created"
        );

        repository.migrate().await?;
        tracing::info!(database = "sqlite", "Database migrations completed");

        Self::new(settings, DefaultUserHooks::new(Arc::new(repository)))
    }
}
