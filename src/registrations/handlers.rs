use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use super::{
    dto::{
        CreateRegistrationRequest, CreateVerificationResponse, RegistrationResponse,
        ValidateRegistrationRequest,
    },
    repo_types::Verification,
    services,
};
use crate::{auth::extractors::JsonBody, state::AppState};

pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/registration/create", post(create_registration))
        .route("/validate/registration", post(validate_registration))
        .route("/verification/create", post(create_verification))
}

#[instrument(skip(state, payload))]
pub async fn create_registration(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateRegistrationRequest>,
) -> Result<Json<RegistrationResponse>, (StatusCode, String)> {
    let registration = services::create_registration(&state, payload).await?;
    Ok(Json(RegistrationResponse {
        is_valid: true,
        registration,
    }))
}

/// An unknown code is a normal answer (`is_valid: false`), not an error.
#[instrument(skip(state, payload))]
pub async fn validate_registration(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ValidateRegistrationRequest>,
) -> Result<Json<RegistrationResponse>, (StatusCode, String)> {
    let found = services::validate_registration(&state, &payload.registration_code).await?;
    Ok(Json(RegistrationResponse {
        is_valid: found.is_some(),
        registration: found.unwrap_or_default(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_verification(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Verification>,
) -> Result<Json<CreateVerificationResponse>, (StatusCode, String)> {
    services::create_verification(&state, payload).await?;
    Ok(Json(CreateVerificationResponse { is_created: true }))
}
