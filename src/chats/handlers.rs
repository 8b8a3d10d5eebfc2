use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        CreateChatUserRequest, CreateChatUserResponse, CreateRoomRequest, DeleteMessageRequest,
        DeleteRoomRequest, DeletedResponse, ListMessagesQuery, ListMessagesResponse,
        ListRoomsQuery, ListRoomsResponse, MessageResponse, RoomResponse, SendMessageRequest,
        UpdateChatUserRequest, UpdateChatUserResponse, UpdateMessageRequest,
    },
    services,
};
use crate::{auth::extractors::JsonBody, pagination::Page, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/chats/users/create", post(create_user))
        .route("/chats/users/update", put(update_user))
}

pub fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/chats/rooms", get(list_rooms))
        .route("/chats/rooms/create", post(create_room))
        .route("/chats/rooms/delete", delete(delete_room))
}

pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/chats/messages", get(list_messages))
        .route("/chats/messages/send", post(send_message))
        .route("/chats/messages/update", put(update_message))
        .route("/chats/messages/delete", delete(delete_message))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateChatUserRequest>,
) -> Result<Json<CreateChatUserResponse>, (StatusCode, String)> {
    services::create_user(&state, payload).await?;
    Ok(Json(CreateChatUserResponse { is_created: true }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateChatUserRequest>,
) -> Result<Json<UpdateChatUserResponse>, (StatusCode, String)> {
    services::update_user(&state, payload).await?;
    Ok(Json(UpdateChatUserResponse { is_updated: true }))
}

#[instrument(skip(state, payload))]
pub async fn create_room(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateRoomRequest>,
) -> Result<Json<RoomResponse>, (StatusCode, String)> {
    let room = services::create_room(&state, payload).await?;
    Ok(Json(RoomResponse { room }))
}

#[instrument(skip(state, payload))]
pub async fn delete_room(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<DeleteRoomRequest>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    let is_deleted = services::delete_room(&state, &payload.room_id).await?;
    Ok(Json(DeletedResponse { is_deleted }))
}

#[instrument(skip(state))]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(q): Query<ListRoomsQuery>,
) -> Result<Json<ListRoomsResponse>, (StatusCode, String)> {
    let rooms = services::list_rooms(&state, q.user_id.as_deref()).await?;
    Ok(Json(ListRoomsResponse { rooms }))
}

#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SendMessageRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let message = services::send_message(&state, payload).await?;
    Ok(Json(MessageResponse { message }))
}

#[instrument(skip(state, payload))]
pub async fn update_message(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateMessageRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let message = services::update_message(&state, &payload.message_id, &payload.body).await?;
    Ok(Json(MessageResponse { message }))
}

#[instrument(skip(state, payload))]
pub async fn delete_message(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<DeleteMessageRequest>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    let is_deleted = services::delete_message(&state, &payload.message_id).await?;
    Ok(Json(DeletedResponse { is_deleted }))
}

#[instrument(skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(q): Query<ListMessagesQuery>,
) -> Result<Json<ListMessagesResponse>, (StatusCode, String)> {
    let page = Page::new(q.page, q.limit)?;
    let messages = services::list_messages(&state, &q.room_id, page).await?;
    Ok(Json(ListMessagesResponse {
        messages,
        page: page.page,
    }))
}
