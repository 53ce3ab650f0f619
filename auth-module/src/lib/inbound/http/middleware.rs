use std::sync::Arc;

use auth::Authenticator;
use auth::Claims;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use super::handlers::INVALID_TOKEN;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;

/// Identity carried by a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub claims: Claims,
}

/// Middleware for host routes that require a token issued by `/auth/login`.
///
/// On success the request gets an [`AuthenticatedUser`] extension:
///
/// ```ignore
/// Router::new()
///     .route("/me", get(me))
///     .route_layer(middleware::from_fn_with_state(auth.authenticator(), require_auth))
/// ```
pub async fn require_auth(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)?;

    let claims = authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token rejected");
        ApiError::from(e)
    })?;

    let user = identify(claims).ok_or_else(|| {
        tracing::warn!("Token lacks a usable subject or email");
        ApiError::Unauthorized(INVALID_TOKEN.to_string())
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn identify(claims: Claims) -> Option<AuthenticatedUser> {
    let user_id = claims.sub.as_deref()?.parse::<UserId>().ok()?;
    let email = EmailAddress::new(claims.email()?).ok()?;

    Some(AuthenticatedUser {
        user_id,
        email,
        claims,
    })
}

fn bearer_token(req: &Request) -> Result<&str, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
            )
        })
}
