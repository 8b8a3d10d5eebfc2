use tracing::{info, warn};

use super::{
    dto::CreateRegistrationRequest,
    repo_types::{Registration, Verification},
};
use crate::{
    auth::services::normalize_email,
    db::with_deadline,
    error::{AppError, AppResult},
    state::AppState,
};

pub async fn create_registration(
    state: &AppState,
    req: CreateRegistrationRequest,
) -> AppResult<Registration> {
    let code = req.registration_code.trim().to_string();
    if code.is_empty() {
        return Err(AppError::bad_request("registration_code is required"));
    }
    let registration = Registration {
        registration_code: code,
        first_name: req.first_name,
        last_name: req.last_name,
        email_address: normalize_email(&req.email_address),
    };
    let created = with_deadline(
        state.config.db_timeout,
        state.registrations.insert_registration(&registration),
    )
    .await?;
    if !created {
        warn!(code = %registration.registration_code, "registration code already exists");
        return Err(AppError::Conflict("Registration code already exists".into()));
    }
    info!(code = %registration.registration_code, "registration created");
    Ok(registration)
}

/// `None` when the code is unknown.
pub async fn validate_registration(
    state: &AppState,
    code: &str,
) -> AppResult<Option<Registration>> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::bad_request("registration_code is required"));
    }
    let found = with_deadline(
        state.config.db_timeout,
        state.registrations.find_registration(code),
    )
    .await?;
    if found.is_none() {
        warn!(%code, "unknown registration code");
    }
    Ok(found)
}

pub async fn create_verification(state: &AppState, req: Verification) -> AppResult<()> {
    if req.token.is_empty() {
        return Err(AppError::bad_request("token is required"));
    }
    let verification = Verification {
        email: normalize_email(&req.email),
        ..req
    };
    let created = with_deadline(
        state.config.db_timeout,
        state.registrations.insert_verification(&verification),
    )
    .await?;
    if !created {
        return Err(AppError::Conflict("Verification token already exists".into()));
    }
    info!(email = %verification.email, "verification created");
    Ok(())
}
