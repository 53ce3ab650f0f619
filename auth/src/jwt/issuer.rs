use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::errors::TokenError;
use super::handler::JwtHandler;

/// Lifetime of a session token when none is configured.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 15;

/// A freshly signed token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Unix timestamp (seconds, UTC) after which the token is rejected
    pub expires_at: i64,
}

/// Issues and verifies time limited session tokens.
///
/// Expiry is computed in whole seconds from the supplied clock value, so
/// `issue_at`/`verify_at` are fully deterministic.
pub struct TokenIssuer {
    handler: JwtHandler,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer with a default token lifetime.
    pub fn new(handler: JwtHandler, lifetime: Duration) -> Self {
        Self { handler, lifetime }
    }

    /// Default lifetime applied by [`TokenIssuer::issue`].
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Signing handler.
    pub fn handler(&self) -> &JwtHandler {
        &self.handler
    }

    /// Issue a token valid for the configured lifetime.
    pub fn issue(&self, claims: Claims) -> Result<IssuedToken, TokenError> {
        self.issue_with_lifetime(claims, self.lifetime)
    }

    /// Issue a token valid for an explicit lifetime.
    pub fn issue_with_lifetime(
        &self,
        claims: Claims,
        lifetime: Duration,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(claims, lifetime, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// `iat` and `exp` supplied by the caller are overwritten.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Lifetime is shorter than one second
    /// * `EncodingFailed` - Claims could not be signed
    pub fn issue_at(
        &self,
        claims: Claims,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        if lifetime.num_seconds() <= 0 {
            return Err(TokenError::InvalidLifetime);
        }

        let issued_at = now.timestamp();
        let expires_at = issued_at + lifetime.num_seconds();
        let claims = claims
            .normalized()
            .with_issued_at(issued_at)
            .with_expiration(expires_at);

        let token = self.handler.encode(&claims)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature, algorithm or encoding is wrong
    /// * `MissingClaim` - Token carries no `exp`
    /// * `Expired` - `now` is past `exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.exp.is_none() {
            return Err(TokenError::MissingClaim("exp".to_string()));
        }

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SECRET: &[u8] = b"issuer_secret_key_at_least_32_bytes!";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            JwtHandler::new(SECRET),
            Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES),
        )
    }

    fn at(timestamp: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(timestamp, 0).unwrap()
    }

    #[test]
    fn test_issue_sets_expiry_from_lifetime() {
        let issued = issuer()
            .issue_at(Claims::new(), Duration::minutes(15), at(1_000_000))
            .unwrap();

        assert_eq!(issued.expires_at, 1_000_000 + 15 * 60);
    }

    #[test]
    fn test_verify_returns_superset_of_claims() {
        let issuer = issuer();
        let claims = Claims::for_user(7, "a@b.com").with_extra("role", "admin");

        let issued = issuer.issue(claims).unwrap();
        let verified = issuer.verify(&issued.token).unwrap();

        assert_eq!(verified.sub, Some("7".to_string()));
        assert_eq!(verified.email(), Some("a@b.com".to_string()));
        assert_eq!(verified.extra.get("role").unwrap(), "admin");
        assert_eq!(verified.exp, Some(issued.expires_at));
        assert!(verified.iat.is_some());
    }

    #[test]
    fn test_caller_expiry_is_overwritten() {
        let issued = issuer()
            .issue_at(
                Claims::new().with_expiration(1),
                Duration::seconds(60),
                at(5_000),
            )
            .unwrap();

        let verified = issuer().verify_at(&issued.token, at(5_000)).unwrap();
        assert_eq!(verified.exp, Some(5_060));
        assert_eq!(verified.iat, Some(5_000));
    }

    #[test]
    fn test_registered_names_passed_as_extra_still_verify() {
        let issuer = issuer();
        let claims = Claims::new()
            .with_extra("exp", 1)
            .with_extra("iat", 1)
            .with_extra("role", "admin");

        let issued = issuer.issue_at(claims, Duration::seconds(60), at(5_000)).unwrap();
        let verified = issuer.verify_at(&issued.token, at(5_000)).unwrap();

        assert_eq!(verified.exp, Some(5_060));
        assert_eq!(verified.iat, Some(5_000));
        assert_eq!(verified.extra.get("role").unwrap(), "admin");
    }

    #[test]
    fn test_registered_names_inserted_into_extra_still_verify() {
        let issuer = issuer();
        let mut claims = Claims::new().with_subject("7");
        claims.extra.insert("exp".to_string(), serde_json::json!(1));
        claims.extra.insert("sub".to_string(), serde_json::json!("8"));

        let issued = issuer.issue_at(claims, Duration::seconds(60), at(5_000)).unwrap();
        let verified = issuer.verify_at(&issued.token, at(5_000)).unwrap();

        assert_eq!(verified.exp, Some(5_060));
        assert_eq!(verified.sub, Some("8".to_string()));
        assert!(verified.extra.is_empty());
    }

    #[test]
    fn test_expiry_boundary() {
        let issuer = issuer();
        let issued = issuer
            .issue_at(Claims::new(), Duration::seconds(30), at(10_000))
            .unwrap();

        assert!(issuer.verify_at(&issued.token, at(10_000)).is_ok());
        assert!(issuer.verify_at(&issued.token, at(10_029)).is_ok());
        assert!(issuer.verify_at(&issued.token, at(10_030)).is_ok());
        assert_eq!(
            issuer.verify_at(&issued.token, at(10_031)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_lifetime_override() {
        let issuer = issuer();
        let issued = issuer
            .issue_at(Claims::new(), Duration::hours(2), at(0))
            .unwrap();

        assert_eq!(issued.expires_at, 7_200);
        assert!(issuer.verify_at(&issued.token, at(3_600)).is_ok());
    }

    #[test]
    fn test_non_positive_lifetime_is_rejected() {
        let issuer = issuer();

        assert_eq!(
            issuer.issue_with_lifetime(Claims::new(), Duration::zero()),
            Err(TokenError::InvalidLifetime)
        );
        assert_eq!(
            issuer.issue_with_lifetime(Claims::new(), Duration::seconds(-5)),
            Err(TokenError::InvalidLifetime)
        );
    }

    #[test]
    fn test_tampering_any_segment_fails() {
        let issuer = issuer();
        let issued = issuer
            .issue(Claims::for_user(1, "a@b.com"))
            .unwrap();
        let token = issued.token;

        for index in 0..token.len() {
            let original = token.as_bytes()[index];
            let replacement = if original == b'A' { b'B' } else { b'A' };

            let mut bytes = token.clone().into_bytes();
            bytes[index] = replacement;
            let tampered = String::from_utf8(bytes).unwrap();

            let result = issuer.verify(&tampered);
            assert!(
                matches!(result, Err(TokenError::InvalidSignature(_))),
                "tampered byte {} was accepted",
                index
            );
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let issued = issuer().issue(Claims::new()).unwrap();
        let other = TokenIssuer::new(
            JwtHandler::new(b"another_secret_key_at_least_32_bytes"),
            Duration::minutes(15),
        );

        assert!(matches!(
            other.verify(&issued.token),
            Err(TokenError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_token_without_expiry_is_rejected() {
        let issuer = issuer();
        let token = issuer
            .handler()
            .encode(&Claims::new().with_subject("1"))
            .unwrap();

        assert_eq!(
            issuer.verify(&token),
            Err(TokenError::MissingClaim("exp".to_string()))
        );
    }
}
