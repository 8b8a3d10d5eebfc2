use serde::{Deserialize, Serialize};

use super::repo_types::{ChatMessage, ChatRoom, ChatUserPatch};
use crate::patch::non_empty;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatUserRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub preferred_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profile_picture_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatUserResponse {
    pub is_created: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChatUserRequest {
    #[serde(default)]
    pub user_id: String,
    pub preferred_name: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl UpdateChatUserRequest {
    pub fn patch(&self) -> ChatUserPatch {
        ChatUserPatch {
            preferred_name: non_empty(self.preferred_name.clone()),
            profile_picture_url: non_empty(self.profile_picture_url.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChatUserResponse {
    pub is_updated: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub room: ChatRoom,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRoomRequest {
    #[serde(default)]
    pub room_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub is_deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRoomsQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListRoomsResponse {
    pub rooms: Vec<ChatRoom>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageRequest {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    #[serde(default)]
    pub message_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesQuery {
    #[serde(default)]
    pub room_id: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<ChatMessage>,
    pub page: i64,
}
