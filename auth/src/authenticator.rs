use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::JwtHandler;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::jwt::DEFAULT_TOKEN_LIFETIME_MINUTES;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
    /// Unix timestamp at which the token stops being accepted
    pub expires_at: i64,
}

impl From<IssuedToken> for AuthenticationResult {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator with HS256 and the default token lifetime.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(
                JwtHandler::new(jwt_secret),
                Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
            ),
        }
    }

    /// Create an authenticator with an explicit algorithm and token lifetime.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm is not in the HMAC family
    /// * `InvalidLifetime` - Lifetime is shorter than one second
    pub fn with_options(
        jwt_secret: &[u8],
        algorithm: Algorithm,
        token_lifetime: Duration,
    ) -> Result<Self, TokenError> {
        if token_lifetime.num_seconds() <= 0 {
            return Err(TokenError::InvalidLifetime);
        }

        Ok(Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(
                JwtHandler::with_algorithm(jwt_secret, algorithm)?,
                token_lifetime,
            ),
        })
    }

    /// Default token lifetime.
    pub fn token_lifetime(&self) -> Duration {
        self.token_issuer.lifetime()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed or password is empty
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to embed in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: Claims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_issuer.issue(claims)?.into())
    }

    /// Issue a token without password verification.
    ///
    /// Used once the credentials have been checked by other means.
    pub fn generate_token(&self, claims: Claims) -> Result<IssuedToken, TokenError> {
        self.token_issuer.issue(claims)
    }

    /// Issue a token with a lifetime other than the default.
    pub fn generate_token_with_lifetime(
        &self,
        claims: Claims,
        lifetime: Duration,
    ) -> Result<IssuedToken, TokenError> {
        self.token_issuer.issue_with_lifetime(claims, lifetime)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed by this authenticator
    /// * `Expired` - Token lifetime has elapsed
    /// * `MissingClaim` - Token carries no expiry
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_issuer.verify(token)
    }
}
