use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::Json;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::handlers::ApiError;

/// Request body could not be read as JSON at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Expected request with `Content-Type: application/json`")]
    UnsupportedContentType,

    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),
}

/// JSON body extractor with the module's rejection mapping.
///
/// A wrong content type and unparsable JSON are transport failures (400).
/// Valid JSON that does not fit the schema's shape is a validation failure
/// (422).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Request body rejected");
                Err(rejection_to_error(rejection))
            }
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => ApiError::UnprocessableEntity {
            detail: err.body_text(),
            errors: Vec::new(),
        },
        JsonRejection::MissingJsonContentType(_) => TransportError::UnsupportedContentType.into(),
        JsonRejection::JsonSyntaxError(err) => TransportError::MalformedBody(err.body_text()).into(),
        other => TransportError::MalformedBody(other.body_text()).into(),
    }
}
