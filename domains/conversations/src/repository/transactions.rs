//! Transaction helpers for Conversations domain

use super::conversations::CONVERSATION_COLUMNS;
use super::messages::MESSAGE_COLUMNS;
use crate::domain::entities::{Conversation, Message};
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Insert a conversation within a transaction
pub async fn insert_conversation_tx(
    tx: &mut Transaction<'_, Postgres>,
    conv: &Conversation,
) -> Result<Conversation, sqlx::Error> {
    let query = format!(
        "INSERT INTO conversations ({CONVERSATION_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {CONVERSATION_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Conversation>(&query)
        .bind(conv.id)
        .bind(conv.buyer_id)
        .bind(conv.seller_id)
        .bind(conv.item_id)
        .bind(conv.created_at)
        .bind(conv.updated_at)
        .fetch_one(&mut **tx)
        .await?;
    Ok(row)
}

/// Insert a message within a transaction. `sequence` comes from the column default.
pub async fn insert_message_tx(
    tx: &mut Transaction<'_, Postgres>,
    msg: &Message,
) -> Result<Message, sqlx::Error> {
    let query = format!(
        "INSERT INTO messages (id, conversation_id, sender_id, content, read, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {MESSAGE_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Message>(&query)
        .bind(msg.id)
        .bind(msg.conversation_id)
        .bind(msg.sender_id)
        .bind(&msg.content)
        .bind(msg.read)
        .bind(msg.created_at)
        .fetch_one(&mut **tx)
        .await?;
    Ok(row)
}

/// Advance a conversation's `updated_at`; GREATEST keeps it monotonic under
/// concurrent writers.
pub async fn touch_conversation_tx(
    tx: &mut Transaction<'_, Postgres>,
    conversation_id: Uuid,
    at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE conversations SET updated_at = GREATEST(updated_at, $2) WHERE id = $1",
    )
    .bind(conversation_id)
    .bind(at)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}

/// Flip every unread message not sent by `viewer_id` to read, as one statement
pub async fn mark_read_tx(
    tx: &mut Transaction<'_, Postgres>,
    conversation_id: Uuid,
    viewer_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE messages SET read = TRUE \
         WHERE conversation_id = $1 AND sender_id <> $2 AND read = FALSE",
    )
    .bind(conversation_id)
    .bind(viewer_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}

/// List messages of a conversation within a transaction
pub async fn list_messages_tx(
    tx: &mut Transaction<'_, Postgres>,
    conversation_id: Uuid,
) -> Result<Vec<Message>, sqlx::Error> {
    let query = format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages \
         WHERE conversation_id = $1 \
         ORDER BY created_at ASC, sequence ASC"
    );
    let rows = sqlx::query_as::<_, Message>(&query)
        .bind(conversation_id)
        .fetch_all(&mut **tx)
        .await?;
    Ok(rows)
}
