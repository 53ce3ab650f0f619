use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::ping::ping;
use super::handlers::register::register;
use crate::domain::user::ports::UserHooks;

/// Path prefix of every auth endpoint.
pub const AUTH_PREFIX: &str = "/auth";

/// State shared by the auth handlers.
pub struct AppState<H: UserHooks> {
    pub hooks: Arc<H>,
    pub authenticator: Arc<Authenticator>,
}

impl<H: UserHooks> AppState<H> {
    pub fn new(hooks: Arc<H>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            hooks,
            authenticator,
        }
    }
}

// Derived Clone would require `H: Clone`.
impl<H: UserHooks> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            hooks: Arc::clone(&self.hooks),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

pub fn create_router<H: UserHooks>(state: AppState<H>) -> Router {
    let auth_routes = Router::new()
        .route("/ping", get(ping))
        .route("/register", post(register::<H>))
        .route("/login", post(login::<H>));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .nest(AUTH_PREFIX, auth_routes)
        .layer(trace_layer)
        .with_state(state)
}
