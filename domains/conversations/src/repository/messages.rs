//! Message repository

use crate::domain::entities::Message;
use swapshop_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const MESSAGE_COLUMNS: &str =
    "id, conversation_id, sender_id, content, read, sequence, created_at";

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List messages for a conversation in conversation order
    pub async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE conversation_id = $1 \
             ORDER BY created_at ASC, sequence ASC"
        );
        let messages = sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    /// Most recent message of a conversation
    pub async fn latest(&self, conversation_id: Uuid) -> Result<Option<Message>> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE conversation_id = $1 \
             ORDER BY created_at DESC, sequence DESC \
             LIMIT 1"
        );
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(message)
    }

    /// Unread messages in one conversation addressed to `viewer_id`
    pub async fn count_unread(&self, conversation_id: Uuid, viewer_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages \
             WHERE conversation_id = $1 AND sender_id <> $2 AND read = FALSE",
        )
        .bind(conversation_id)
        .bind(viewer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Unread messages addressed to `user_id` across all their conversations
    pub async fn count_unread_for_user(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM messages m
            JOIN conversations c ON c.id = m.conversation_id
            WHERE (c.buyer_id = $1 OR c.seller_id = $1)
              AND m.sender_id <> $1
              AND m.read = FALSE
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
