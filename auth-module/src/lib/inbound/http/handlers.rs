use auth::TokenError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::extract::TransportError;
use crate::user::errors::FieldViolation;
use crate::user::errors::UserError;
use crate::user::errors::ValidationError;

pub mod login;
pub mod ping;
pub mod register;

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub(crate) const INVALID_TOKEN: &str = "Invalid or expired token";
const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity {
        detail: String,
        errors: Vec<FieldViolation>,
    },
    BadRequest(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InternalServerError(detail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ApiErrorBody::new(detail))
            }
            ApiError::UnprocessableEntity { detail, errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorBody { detail, errors },
            ),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, ApiErrorBody::new(detail)),
            ApiError::Unauthorized(detail) => {
                (StatusCode::UNAUTHORIZED, ApiErrorBody::new(detail))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::UnprocessableEntity {
            detail: err.to_string(),
            errors: err.violations,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(_: TokenError) -> Self {
        ApiError::Unauthorized(INVALID_TOKEN.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(err) => err.into(),
            UserError::AlreadyExists(_) => ApiError::Unauthorized("User already exists".to_string()),
            UserError::Auth(_) => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError(INTERNAL_ERROR.to_string())
            }
        }
    }
}

/// Error body: `{"detail": ...}`, plus per-field `errors` on validation
/// failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
}

impl ApiErrorBody {
    pub fn new(detail: String) -> Self {
        Self {
            detail,
            errors: Vec::new(),
        }
    }
}
