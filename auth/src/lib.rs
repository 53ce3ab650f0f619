//! Authentication utilities library
//!
//! Provides the credential and session token primitives used by the auth module:
//! - Password hashing (Argon2id)
//! - Signed, time limited session tokens (HMAC JWT)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Claims, JwtHandler, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(
//!     JwtHandler::new(b"secret_key_at_least_32_bytes_long!"),
//!     Duration::minutes(15),
//! );
//! let issued = issuer.issue(Claims::new().with_subject("user123")).unwrap();
//! let claims = issuer.verify(&issued.token).unwrap();
//! assert_eq!(claims.exp, Some(issued.expires_at));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth
//!     .authenticate("password123", &hash, Claims::for_user(1, "a@b.com"))
//!     .unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.email().as_deref(), Some("a@b.com"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jsonwebtoken::Algorithm;
pub use jwt::parse_algorithm;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtHandler;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::DEFAULT_TOKEN_LIFETIME_MINUTES;
pub use password::PasswordError;
pub use password::PasswordHasher;
