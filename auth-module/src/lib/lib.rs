//! Pluggable registration and login for axum applications.
//!
//! [`AuthModule`] owns the user hooks and the token authenticator and
//! contributes `/auth/ping`, `/auth/register` and `/auth/login` to a host
//! router. Host routes are protected with [`require_auth`].

pub mod config;
pub mod domain;
pub mod inbound;
pub mod module;
pub mod outbound;

pub use domain::user;
pub use inbound::http::middleware::require_auth;
pub use inbound::http::middleware::AuthenticatedUser;
pub use module::AuthModule;
pub use module::AuthSettings;
pub use module::ModuleError;
pub use outbound::repositories;
