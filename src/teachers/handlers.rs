use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        CreateTeacherRequest, CustomDeleteTeacherRequest, CustomGetTeacherRequest,
        DeleteTeacherResponse, GetTeacherResponse, ListTeachersQuery, ListTeachersResponse,
        TeacherIdQuery, TeacherInfo, UpdateTeacherRequest,
    },
    services,
};
use crate::{
    auth::{dto::LoginRequest, extractors::JsonBody},
    pagination::Page,
    state::AppState,
};

pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/teachers", get(list_teachers))
        .route("/teachers/create", post(create_teacher))
        .route("/teachers/validate/login", post(validate_login))
        .route("/teachers/update", put(update_teacher))
        .route("/teachers/get", get(get_teacher))
        .route("/teachers/get/custom", post(custom_get_teacher))
        .route("/teachers/delete", delete(delete_teacher))
        .route("/teachers/delete/custom", delete(custom_delete_teacher))
}

#[instrument(skip(state, payload))]
pub async fn create_teacher(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateTeacherRequest>,
) -> Result<Json<TeacherInfo>, (StatusCode, String)> {
    Ok(Json(services::create_teacher(&state, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn validate_login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<TeacherInfo>, (StatusCode, String)> {
    let outcome = services::validate_login(&state, payload).await?;
    match outcome.profile {
        Some(teacher) if outcome.is_valid => Ok(Json(teacher)),
        _ => Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn update_teacher(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateTeacherRequest>,
) -> Result<Json<TeacherInfo>, (StatusCode, String)> {
    Ok(Json(services::update_teacher(&state, payload).await?))
}

#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    Query(q): Query<TeacherIdQuery>,
) -> Result<Json<GetTeacherResponse>, (StatusCode, String)> {
    let teacher = services::get_teacher(&state, &q.teacher_id).await?;
    Ok(Json(GetTeacherResponse { teacher }))
}

#[instrument(skip(state, payload))]
pub async fn custom_get_teacher(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CustomGetTeacherRequest>,
) -> Result<Json<GetTeacherResponse>, (StatusCode, String)> {
    let teacher = services::custom_get_teacher(&state, payload.into()).await?;
    Ok(Json(GetTeacherResponse { teacher }))
}

#[instrument(skip(state))]
pub async fn list_teachers(
    State(state): State<AppState>,
    Query(q): Query<ListTeachersQuery>,
) -> Result<Json<ListTeachersResponse>, (StatusCode, String)> {
    let page = Page::new(q.page, q.limit)?;
    let teachers = services::list_teachers(&state, page).await?;
    Ok(Json(ListTeachersResponse {
        teachers,
        page: page.page,
    }))
}

#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Query(q): Query<TeacherIdQuery>,
) -> Result<Json<DeleteTeacherResponse>, (StatusCode, String)> {
    let is_deleted = services::delete_teacher(&state, &q.teacher_id).await?;
    Ok(Json(DeleteTeacherResponse { is_deleted }))
}

#[instrument(skip(state, payload))]
pub async fn custom_delete_teacher(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CustomDeleteTeacherRequest>,
) -> Result<Json<DeleteTeacherResponse>, (StatusCode, String)> {
    let is_deleted = services::custom_delete_teacher(&state, payload.into()).await?;
    Ok(Json(DeleteTeacherResponse { is_deleted }))
}
