use axum::{extract::State, http::StatusCode, Json};
use common::errors::ApiError;
use common::models::{RegisterUser, UserPublic};
use common::telemetry::{record_registration, RegistrationOutcome};
use common::users;

use crate::extract::ValidatedJson;
use crate::handlers::ErrorResponse;
use crate::state::AppState;

/// Register a user.
///
/// Body is validated first; only then is a unit of work acquired and handed
/// to the persistence operation, which owns it until commit or drop.
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<ValidatedJson<RegisterUser>, ErrorResponse>,
) -> Result<(StatusCode, Json<UserPublic>), ErrorResponse> {
    let ValidatedJson(req) = body.map_err(|rejection| {
        record_registration(RegistrationOutcome::Rejected);
        rejection
    })?;

    let username = req.username.clone();

    let uow = state.db.begin().await.map_err(|e| {
        tracing::error!(username = %username, error = %e, "Failed to acquire unit of work");
        record_registration(RegistrationOutcome::Failed);
        ErrorResponse::from(ApiError::from(e))
    })?;

    let user = users::create_user(uow, req).await.map_err(|e| {
        tracing::error!(username = %username, error = %e, "Failed to create user");
        record_registration(RegistrationOutcome::Failed);
        ErrorResponse::from(ApiError::from(e))
    })?;

    record_registration(RegistrationOutcome::Created);
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}
