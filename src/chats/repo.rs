use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::repo_types::{ChatMessage, ChatRoom, ChatUser, ChatUserPatch};
use crate::{db::StoreResult, pagination::Page};

/// Chat users, rooms and the messages posted in them.
#[async_trait]
pub trait ChatRepo: Send + Sync {
    /// `false` when the user id is already taken.
    async fn insert_user(&self, user: &ChatUser) -> StoreResult<bool>;
    async fn update_user(&self, user_id: &str, patch: &ChatUserPatch) -> StoreResult<bool>;

    async fn insert_room(&self, room: &ChatRoom) -> StoreResult<()>;
    /// Messages of the room go with it.
    async fn delete_room(&self, room_id: &str) -> StoreResult<bool>;
    /// Newest first; `member` keeps only rooms listing that id.
    async fn list_rooms(&self, member: Option<&str>) -> StoreResult<Vec<ChatRoom>>;

    /// `false` when the room does not exist.
    async fn insert_message(&self, message: &ChatMessage) -> StoreResult<bool>;
    async fn edit_message(
        &self,
        message_id: &str,
        body: &str,
        edited_at: OffsetDateTime,
    ) -> StoreResult<Option<ChatMessage>>;
    async fn delete_message(&self, message_id: &str) -> StoreResult<bool>;
    /// Oldest first.
    async fn list_messages(&self, room_id: &str, page: Page) -> StoreResult<Vec<ChatMessage>>;
}

pub struct PgChatRepo {
    db: PgPool,
}

impl PgChatRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatRepo for PgChatRepo {
    async fn insert_user(&self, u: &ChatUser) -> StoreResult<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO chat_users (user_id, user_type, preferred_name, first_name, last_name, profile_picture_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(&u.user_id)
        .bind(&u.user_type)
        .bind(&u.preferred_name)
        .bind(&u.first_name)
        .bind(&u.last_name)
        .bind(&u.profile_picture_url)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn update_user(&self, user_id: &str, p: &ChatUserPatch) -> StoreResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE chat_users SET
                preferred_name = COALESCE($2, preferred_name),
                profile_picture_url = COALESCE($3, profile_picture_url)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(&p.preferred_name)
        .bind(&p.profile_picture_url)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn insert_room(&self, r: &ChatRoom) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO chat_rooms (room_id, name, member_ids, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&r.room_id)
        .bind(&r.name)
        .bind(&r.member_ids)
        .bind(r.created_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn delete_room(&self, room_id: &str) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM chat_rooms WHERE room_id = $1")
            .bind(room_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_rooms(&self, member: Option<&str>) -> StoreResult<Vec<ChatRoom>> {
        let rows = sqlx::query_as::<_, ChatRoom>(
            r#"
            SELECT room_id, name, member_ids, created_at
            FROM chat_rooms
            WHERE ($1::TEXT IS NULL OR $1 = ANY(member_ids))
            ORDER BY created_at DESC
            "#,
        )
        .bind(member)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_message(&self, m: &ChatMessage) -> StoreResult<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO chat_messages (message_id, room_id, sender_id, body, sent_at, edited_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&m.message_id)
        .bind(&m.room_id)
        .bind(&m.sender_id)
        .bind(&m.body)
        .bind(m.sent_at)
        .bind(m.edited_at)
        .execute(&self.db)
        .await;
        match res {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn edit_message(
        &self,
        message_id: &str,
        body: &str,
        edited_at: OffsetDateTime,
    ) -> StoreResult<Option<ChatMessage>> {
        let row = sqlx::query_as::<_, ChatMessage>(
            r#"
            UPDATE chat_messages SET body = $2, edited_at = $3
            WHERE message_id = $1
            RETURNING message_id, room_id, sender_id, body, sent_at, edited_at
            "#,
        )
        .bind(message_id)
        .bind(body)
        .bind(edited_at)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_message(&self, message_id: &str) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM chat_messages WHERE message_id = $1")
            .bind(message_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_messages(&self, room_id: &str, page: Page) -> StoreResult<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT message_id, room_id, sender_id, body, sent_at, edited_at
            FROM chat_messages
            WHERE room_id = $1
            ORDER BY sent_at ASC, message_id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(room_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
