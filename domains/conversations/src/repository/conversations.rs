//! Conversation repository

use crate::domain::entities::Conversation;
use swapshop_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const CONVERSATION_COLUMNS: &str =
    "id, buyer_id, seller_id, item_id, created_at, updated_at";

#[derive(Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find conversation by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Conversation>> {
        let query = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1");
        let conv = sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(conv)
    }

    /// Find the conversation for an exact `(buyer, seller, item)` triple
    pub async fn find_by_participants(
        &self,
        buyer_id: Uuid,
        seller_id: Uuid,
        item_id: Option<i64>,
    ) -> Result<Option<Conversation>> {
        let query = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE buyer_id = $1 AND seller_id = $2 AND item_id IS NOT DISTINCT FROM $3"
        );
        let conv = sqlx::query_as::<_, Conversation>(&query)
            .bind(buyer_id)
            .bind(seller_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(conv)
    }

    /// List conversations where the user is buyer or seller, freshest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>> {
        let query = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE buyer_id = $1 OR seller_id = $1 \
             ORDER BY updated_at DESC, id DESC"
        );
        let convs = sqlx::query_as::<_, Conversation>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(convs)
    }
}
