use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserHooks;
use crate::domain::user::schemas::RequestSchema;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::router::AppState;

/// Register a user through the module's `create_user` hook.
///
/// The body is parsed as the hooks' registration schema and validated
/// before anything reaches storage.
pub async fn register<H: UserHooks>(
    State(state): State<AppState<H>>,
    JsonBody(body): JsonBody<H::Registration>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let input = body.validate()?;

    state.hooks.create_user(input).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RegisterResponseData {
            status: "ok".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub status: String,
}
