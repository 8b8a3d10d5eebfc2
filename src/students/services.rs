use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateStudentRequest, StudentInfo, UpdateStudentRequest},
    repo_types::{Student, StudentSummary},
};
use crate::{
    auth::{
        dto::{ExternalLoginRequest, LoginOutcome, LoginRequest},
        keys::store_public_key,
        services::{
            check_login, is_valid_email, issue_credentials, normalize_email,
            verified_identity_email,
        },
    },
    db::with_deadline,
    error::{AppError, AppResult},
    pagination::Page,
    patch::AccountLookup,
    state::AppState,
};

/// Inserts a new student and returns its generated id.
pub async fn create_student(state: &AppState, req: CreateStudentRequest) -> AppResult<String> {
    let email = normalize_email(&req.email_address);
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("Invalid email"));
    }
    if req.password.is_empty() {
        return Err(AppError::bad_request("Password is required"));
    }

    let timeout = state.config.db_timeout;
    if with_deadline(timeout, state.students.find_by_email(&email))
        .await?
        .is_some()
    {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let creds = issue_credentials(&state.hasher, req.password, email.clone()).await?;
    let student = Student {
        student_id: Uuid::new_v4().to_string(),
        first_name: req.first_name,
        preferred_name: req.preferred_name,
        last_name: req.last_name,
        email_address: email,
        password_hash: creds.password_hash,
        salt: creds.salt,
        native_language: req.native_language,
        preferred_language: req.preferred_language,
        student_since: OffsetDateTime::now_utc(),
        profile_picture_url: req.profile_picture_url,
        profile_picture_path: req.profile_picture_path,
        theme_mode: req.theme_mode,
        font_style: req.font_style,
        time_zone: req.time_zone,
        lessons_remaining: 0,
        lessons_completed: 0,
    };
    // Concurrent creates that both passed the check above are settled by the
    // unique indexes; the loser comes back as a conflict.
    with_deadline(timeout, state.students.insert(&student)).await?;

    store_public_key(
        state.keys.as_ref(),
        &student.student_id,
        req.public_key.as_deref(),
    )
    .await;

    info!(student_id = %student.student_id, "student created");
    Ok(student.student_id)
}

pub async fn validate_login(
    state: &AppState,
    req: LoginRequest,
) -> AppResult<LoginOutcome<StudentInfo>> {
    let email = normalize_email(&req.email_address);
    let found = with_deadline(
        state.config.login_timeout,
        state.students.find_by_email(&email),
    )
    .await?;
    let outcome = check_login(&state.hasher, found, &email, req.password).await?;
    Ok(LoginOutcome {
        is_valid: outcome.is_valid,
        profile: outcome.profile.map(StudentInfo::from),
    })
}

/// Login through a verified identity token; no password is compared.
pub async fn validate_external_login(
    state: &AppState,
    req: ExternalLoginRequest,
) -> AppResult<LoginOutcome<StudentInfo>> {
    let email = verified_identity_email(state.identity.as_deref(), &req)?;
    let found = with_deadline(
        state.config.login_timeout,
        state.students.find_by_email(&email),
    )
    .await?;
    match found {
        Some(student) => {
            info!(student_id = %student.student_id, "external login ok");
            Ok(LoginOutcome::valid(student.into()))
        }
        None => {
            warn!(%email, "login unknown email");
            Ok(LoginOutcome::invalid())
        }
    }
}

pub async fn update_student(
    state: &AppState,
    req: UpdateStudentRequest,
) -> AppResult<StudentInfo> {
    let lookup = AccountLookup::resolve(req.student_id.clone(), req.email_address.clone())?;
    let patch = req.patch();
    let updated = with_deadline(
        state.config.db_timeout,
        state.students.update(&lookup, &patch),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Student"))?;

    store_public_key(
        state.keys.as_ref(),
        &updated.student_id,
        req.public_key.as_deref(),
    )
    .await;

    info!(student_id = %updated.student_id, "student updated");
    Ok(updated.into())
}

pub async fn get_student(state: &AppState, student_id: &str) -> AppResult<StudentInfo> {
    if student_id.is_empty() {
        return Err(AppError::bad_request("student_id is required"));
    }
    with_deadline(
        state.config.db_timeout,
        state.students.find_by_id(student_id),
    )
    .await?
    .map(StudentInfo::from)
    .ok_or_else(|| AppError::not_found("Student"))
}

pub async fn list_students(state: &AppState, page: Page) -> AppResult<Vec<StudentSummary>> {
    Ok(with_deadline(state.config.db_timeout, state.students.list(page)).await?)
}

pub async fn delete_student(state: &AppState, student_id: &str) -> AppResult<bool> {
    if student_id.is_empty() {
        return Err(AppError::bad_request("student_id is required"));
    }
    let deleted = with_deadline(
        state.config.db_timeout,
        state.students.delete(student_id),
    )
    .await?;
    info!(%student_id, deleted, "student delete");
    Ok(deleted)
}
