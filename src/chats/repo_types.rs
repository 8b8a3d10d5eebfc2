use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Directory entry for chat participants; written only, never listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub user_id: String,
    pub user_type: String,
    pub preferred_name: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_picture_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChatUserPatch {
    pub preferred_name: Option<String>,
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub room_id: String,
    pub name: String,
    pub member_ids: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message_id: String,
    pub room_id: String,
    pub sender_id: String,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub edited_at: Option<OffsetDateTime>,
}
