use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        CreateLessonRequest, DeleteLessonRequest, DeleteLessonResponse, LessonIdQuery,
        LessonResponse, ListLessonsQuery, ListLessonsResponse, UpdateLessonRequest,
    },
    services,
};
use crate::{auth::extractors::JsonBody, pagination::Page, state::AppState};

pub fn lesson_routes() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(list_lessons))
        .route("/lessons/create", post(create_lesson))
        .route("/lessons/get", get(get_lesson))
        .route("/lessons/update", put(update_lesson))
        .route("/lessons/delete", delete(delete_lesson))
}

#[instrument(skip(state, payload))]
pub async fn create_lesson(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateLessonRequest>,
) -> Result<Json<LessonResponse>, (StatusCode, String)> {
    let lesson = services::create_lesson(&state, payload).await?;
    Ok(Json(LessonResponse { lesson }))
}

#[instrument(skip(state))]
pub async fn get_lesson(
    State(state): State<AppState>,
    Query(q): Query<LessonIdQuery>,
) -> Result<Json<LessonResponse>, (StatusCode, String)> {
    let lesson = services::get_lesson(&state, &q.lesson_id).await?;
    Ok(Json(LessonResponse { lesson }))
}

#[instrument(skip(state, payload))]
pub async fn update_lesson(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateLessonRequest>,
) -> Result<Json<LessonResponse>, (StatusCode, String)> {
    let lesson = services::update_lesson(&state, payload).await?;
    Ok(Json(LessonResponse { lesson }))
}

#[instrument(skip(state))]
pub async fn list_lessons(
    State(state): State<AppState>,
    Query(q): Query<ListLessonsQuery>,
) -> Result<Json<ListLessonsResponse>, (StatusCode, String)> {
    let page = Page::new(q.page, q.limit)?;
    let lessons = services::list_lessons(&state, q.filter(), page).await?;
    Ok(Json(ListLessonsResponse {
        lessons,
        page: page.page,
    }))
}

#[instrument(skip(state, payload))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<DeleteLessonRequest>,
) -> Result<Json<DeleteLessonResponse>, (StatusCode, String)> {
    let is_deleted = services::delete_lesson(&state, &payload.lesson_id).await?;
    Ok(Json(DeleteLessonResponse { is_deleted }))
}
