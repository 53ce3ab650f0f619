use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::errors::UserError;
use crate::domain::user::ports::UserHooks;
use crate::domain::user::schemas::RequestSchema;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::router::AppState;

/// Check credentials through the module's `login_user` hook and issue a
/// bearer token for the returned user.
pub async fn login<H: UserHooks>(
    State(state): State<AppState<H>>,
    JsonBody(body): JsonBody<H::Login>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let credentials = body.validate()?;

    let user = state.hooks.login_user(credentials).await.map_err(|e| {
        // The response is the same for both kinds; only the log says which.
        if let UserError::Auth(reason) = &e {
            tracing::warn!(reason = %reason, "Login rejected");
        }
        ApiError::from(e)
    })?;

    let claims = auth::Claims::for_user(user.id, user.email.as_str());
    let issued = state.authenticator.generate_token(claims).map_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "Token generation failed");
        ApiError::InternalServerError("Token generation failed".to_string())
    })?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenResponseData {
            access_token: issued.token,
            token_type: "bearer".to_string(),
            expires_at: issued.expires_at,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub token_type: String,
    /// Unix timestamp, in seconds.
    pub expires_at: i64,
}
