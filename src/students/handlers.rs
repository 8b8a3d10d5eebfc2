use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        CreateStudentRequest, CreateStudentResponse, DeleteStudentRequest, DeleteStudentResponse,
        GetStudentQuery, GetStudentResponse, ListStudentsQuery, ListStudentsResponse,
        StudentInfo, UpdateStudentRequest,
    },
    services,
};
use crate::{
    auth::{
        dto::{ExternalLoginRequest, LoginOutcome, LoginRequest},
        extractors::JsonBody,
    },
    pagination::Page,
    state::AppState,
};

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students/create", post(create_student))
        .route("/students/get", get(get_student))
        .route("/students/update", put(update_student))
        .route("/students/delete", delete(delete_student))
}

pub fn login_routes() -> Router<AppState> {
    Router::new()
        .route("/validate/login", post(validate_login))
        .route("/validate/login/external", post(validate_external_login))
}

#[instrument(skip(state, payload))]
pub async fn create_student(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateStudentRequest>,
) -> Result<Json<CreateStudentResponse>, (StatusCode, String)> {
    let student_id = services::create_student(&state, payload).await?;
    Ok(Json(CreateStudentResponse { student_id }))
}

#[instrument(skip(state, payload))]
pub async fn validate_login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<StudentInfo>, (StatusCode, String)> {
    let outcome = services::validate_login(&state, payload).await?;
    login_response(outcome)
}

#[instrument(skip(state, payload))]
pub async fn validate_external_login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ExternalLoginRequest>,
) -> Result<Json<StudentInfo>, (StatusCode, String)> {
    let outcome = services::validate_external_login(&state, payload).await?;
    login_response(outcome)
}

/// Successful logins answer with the flat profile; anything else is a 401.
fn login_response(
    outcome: LoginOutcome<StudentInfo>,
) -> Result<Json<StudentInfo>, (StatusCode, String)> {
    match outcome.profile {
        Some(student) if outcome.is_valid => Ok(Json(student)),
        _ => Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn update_student(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateStudentRequest>,
) -> Result<Json<StudentInfo>, (StatusCode, String)> {
    let student = services::update_student(&state, payload).await?;
    Ok(Json(student))
}

#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Query(q): Query<GetStudentQuery>,
) -> Result<Json<GetStudentResponse>, (StatusCode, String)> {
    let student = services::get_student(&state, &q.student_id).await?;
    Ok(Json(GetStudentResponse { student }))
}

#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
    Query(q): Query<ListStudentsQuery>,
) -> Result<Json<ListStudentsResponse>, (StatusCode, String)> {
    let page = Page::new(q.page, q.limit)?;
    let students = services::list_students(&state, page).await?;
    Ok(Json(ListStudentsResponse {
        students,
        page: page.page,
    }))
}

#[instrument(skip(state, payload))]
pub async fn delete_student(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<DeleteStudentRequest>,
) -> Result<Json<DeleteStudentResponse>, (StatusCode, String)> {
    let is_deleted = services::delete_student(&state, &payload.student_id).await?;
    Ok(Json(DeleteStudentResponse { is_deleted }))
}
