use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateChatUserRequest, CreateRoomRequest, SendMessageRequest, UpdateChatUserRequest},
    repo_types::{ChatMessage, ChatRoom, ChatUser},
};
use crate::{
    db::with_deadline,
    error::{AppError, AppResult},
    pagination::Page,
    state::AppState,
};

pub async fn create_user(state: &AppState, req: CreateChatUserRequest) -> AppResult<()> {
    if req.user_id.is_empty() {
        return Err(AppError::bad_request("userId is required"));
    }
    let user = ChatUser {
        user_id: req.user_id,
        user_type: req.user_type,
        preferred_name: req.preferred_name,
        first_name: req.first_name,
        last_name: req.last_name,
        profile_picture_url: req.profile_picture_url,
    };
    let created = with_deadline(state.config.db_timeout, state.chats.insert_user(&user)).await?;
    if !created {
        warn!(user_id = %user.user_id, "chat user already exists");
        return Err(AppError::Conflict("Chat user already exists".into()));
    }
    info!(user_id = %user.user_id, "chat user created");
    Ok(())
}

pub async fn update_user(state: &AppState, req: UpdateChatUserRequest) -> AppResult<()> {
    if req.user_id.is_empty() {
        return Err(AppError::bad_request("userId is required"));
    }
    let patch = req.patch();
    let updated = with_deadline(
        state.config.db_timeout,
        state.chats.update_user(&req.user_id, &patch),
    )
    .await?;
    if !updated {
        return Err(AppError::not_found("Chat user"));
    }
    Ok(())
}

pub async fn create_room(state: &AppState, req: CreateRoomRequest) -> AppResult<ChatRoom> {
    let mut member_ids: Vec<String> = req
        .member_ids
        .into_iter()
        .filter(|id| !id.is_empty())
        .collect();
    member_ids.sort();
    member_ids.dedup();
    if member_ids.is_empty() {
        return Err(AppError::bad_request("memberIds must name at least one user"));
    }
    let room = ChatRoom {
        room_id: Uuid::new_v4().to_string(),
        name: req.name,
        member_ids,
        created_at: OffsetDateTime::now_utc(),
    };
    with_deadline(state.config.db_timeout, state.chats.insert_room(&room)).await?;
    info!(room_id = %room.room_id, members = room.member_ids.len(), "chat room created");
    Ok(room)
}

pub async fn delete_room(state: &AppState, room_id: &str) -> AppResult<bool> {
    if room_id.is_empty() {
        return Err(AppError::bad_request("roomId is required"));
    }
    let deleted = with_deadline(state.config.db_timeout, state.chats.delete_room(room_id)).await?;
    info!(%room_id, deleted, "chat room delete");
    Ok(deleted)
}

pub async fn list_rooms(state: &AppState, member: Option<&str>) -> AppResult<Vec<ChatRoom>> {
    let member = member.filter(|m| !m.is_empty());
    Ok(with_deadline(state.config.db_timeout, state.chats.list_rooms(member)).await?)
}

pub async fn send_message(state: &AppState, req: SendMessageRequest) -> AppResult<ChatMessage> {
    if req.room_id.is_empty() || req.sender_id.is_empty() {
        return Err(AppError::bad_request("roomId and senderId are required"));
    }
    if req.body.is_empty() {
        return Err(AppError::bad_request("body must not be empty"));
    }
    let message = ChatMessage {
        message_id: Uuid::new_v4().to_string(),
        room_id: req.room_id,
        sender_id: req.sender_id,
        body: req.body,
        sent_at: OffsetDateTime::now_utc(),
        edited_at: None,
    };
    let stored = with_deadline(state.config.db_timeout, state.chats.insert_message(&message)).await?;
    if !stored {
        return Err(AppError::not_found("Chat room"));
    }
    Ok(message)
}

pub async fn update_message(
    state: &AppState,
    message_id: &str,
    body: &str,
) -> AppResult<ChatMessage> {
    if message_id.is_empty() {
        return Err(AppError::bad_request("messageId is required"));
    }
    if body.is_empty() {
        return Err(AppError::bad_request("body must not be empty"));
    }
    with_deadline(
        state.config.db_timeout,
        state
            .chats
            .edit_message(message_id, body, OffsetDateTime::now_utc()),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Message"))
}

pub async fn delete_message(state: &AppState, message_id: &str) -> AppResult<bool> {
    if message_id.is_empty() {
        return Err(AppError::bad_request("messageId is required"));
    }
    Ok(with_deadline(state.config.db_timeout, state.chats.delete_message(message_id)).await?)
}

pub async fn list_messages(
    state: &AppState,
    room_id: &str,
    page: Page,
) -> AppResult<Vec<ChatMessage>> {
    if room_id.is_empty() {
        return Err(AppError::bad_request("roomId is required"));
    }
    Ok(with_deadline(state.config.db_timeout, state.chats.list_messages(room_id, page)).await?)
}
