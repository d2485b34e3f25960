// Request extractors

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use common::errors::ApiError;
use common::validation::{self, Validate};
use serde::de::DeserializeOwned;

use crate::handlers::ErrorResponse;

/// JSON body that has been deserialized, normalized and validated.
///
/// Malformed or invalid bodies are rejected with 422 before the handler runs,
/// so no unit of work is acquired for them.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_response)?;

        let value = value.normalize();
        value.validate().map_err(|e| {
            tracing::debug!(error = %e, "Request body failed validation");
            ErrorResponse::from(ApiError::from(e))
        })?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_response(rejection: JsonRejection) -> ErrorResponse {
    tracing::debug!(error = %rejection, "Rejected request body");
    match rejection {
        JsonRejection::MissingJsonContentType(e) => {
            ErrorResponse::new("unsupported_media_type", e.body_text())
        }
        JsonRejection::JsonDataError(e) => {
            ErrorResponse::from(ApiError::from(validation::from_body_error(&e.body_text())))
        }
        JsonRejection::JsonSyntaxError(e) => {
            ErrorResponse::from(ApiError::from(validation::from_body_error(&e.body_text())))
        }
        other => ErrorResponse::new("bad_request", other.body_text()),
    }
}
