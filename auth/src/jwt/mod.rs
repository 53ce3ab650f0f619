pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;

pub use claims::Claims;
pub use errors::TokenError;
pub use handler::parse_algorithm;
pub use handler::JwtHandler;
pub use issuer::IssuedToken;
pub use issuer::TokenIssuer;
pub use issuer::DEFAULT_TOKEN_LIFETIME_MINUTES;
