use thiserror::Error;

/// Error type for token operations.
///
/// Every verification failure other than expiry is reported as
/// `InvalidSignature`: a wrong secret, a different algorithm, a tampered or
/// malformed token all look the same to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid: {0}")]
    InvalidSignature(String),

    #[error("Token is expired")]
    Expired,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token lifetime must be at least one second")]
    InvalidLifetime,
}
