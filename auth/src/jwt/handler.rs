use std::str::FromStr;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::TokenError;

/// JWT token handler for signing and checking tokens.
///
/// Generic over the claims type. Only the HMAC family is supported since the
/// handler is built from a shared secret; HS256 is the default.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new HS256 handler with a secret key.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Create a handler for a specific HMAC algorithm.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm is not HS256, HS384 or HS512
    pub fn with_algorithm(secret: &[u8], algorithm: Algorithm) -> Result<Self, TokenError> {
        if !is_hmac(algorithm) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        Ok(Self {
            algorithm,
            ..Self::new(secret)
        })
    }

    /// Signing algorithm used for every token.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encode claims into a signed JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Check the signature and algorithm of a token and decode its claims.
    ///
    /// Time based claims are not checked here; expiry is the issuer's job so
    /// it can be evaluated against an explicit clock.
    ///
    /// # Errors
    /// * `InvalidSignature` - Wrong secret, wrong algorithm, or malformed token
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::InvalidSignature(e.to_string()))
    }
}

/// Parse an algorithm name such as `"HS256"`.
///
/// # Errors
/// * `UnsupportedAlgorithm` - Unknown name or not an HMAC algorithm
pub fn parse_algorithm(name: &str) -> Result<Algorithm, TokenError> {
    Algorithm::from_str(name)
        .ok()
        .filter(|algorithm| is_hmac(*algorithm))
        .ok_or_else(|| TokenError::UnsupportedAlgorithm(name.to_string()))
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}
