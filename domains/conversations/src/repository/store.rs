//! Storage seam for the conversation services
//!
//! `ConversationsRepositories` is the PostgreSQL implementation;
//! `InMemoryConversationStore` backs tests and local runs.

use async_trait::async_trait;
use swapshop_common::{Error, RepositoryError, Result};
use uuid::Uuid;

use super::transactions::{
    insert_conversation_tx, insert_message_tx, list_messages_tx, mark_read_tx,
    touch_conversation_tx,
};
use super::ConversationsRepositories;
use crate::domain::entities::{Conversation, Message};

#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn find_conversation(&self, id: Uuid) -> Result<Option<Conversation>>;

    async fn find_by_participants(
        &self,
        buyer_id: Uuid,
        seller_id: Uuid,
        item_id: Option<i64>,
    ) -> Result<Option<Conversation>>;

    /// Insert a conversation together with its opening message, all or
    /// nothing. `Error::Conflict` if the triple already exists.
    async fn create_conversation_with_message(
        &self,
        conversation: &Conversation,
        message: &Message,
    ) -> Result<(Conversation, Message)>;

    /// Conversations of a user ordered by `updated_at` descending
    async fn list_conversations_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>>;

    /// Insert a message and advance the conversation's `updated_at` atomically
    async fn append_message(&self, message: &Message) -> Result<Message>;

    async fn latest_message(&self, conversation_id: Uuid) -> Result<Option<Message>>;

    /// Mark the other participant's unread messages read in one batch, then
    /// return the whole ordered history
    async fn mark_read_and_list(&self, conversation_id: Uuid, viewer_id: Uuid)
        -> Result<Vec<Message>>;

    async fn count_unread(&self, conversation_id: Uuid, viewer_id: Uuid) -> Result<i64>;

    async fn count_unread_for_user(&self, user_id: Uuid) -> Result<i64>;
}

#[async_trait]
impl ConversationStore for ConversationsRepositories {
    async fn find_conversation(&self, id: Uuid) -> Result<Option<Conversation>> {
        self.conversations.find(id).await
    }

    async fn find_by_participants(
        &self,
        buyer_id: Uuid,
        seller_id: Uuid,
        item_id: Option<i64>,
    ) -> Result<Option<Conversation>> {
        self.conversations
            .find_by_participants(buyer_id, seller_id, item_id)
            .await
    }

    async fn create_conversation_with_message(
        &self,
        conversation: &Conversation,
        message: &Message,
    ) -> Result<(Conversation, Message)> {
        let mut tx = self.begin().await?;

        let mut created = insert_conversation_tx(&mut tx, conversation)
            .await
            .map_err(RepositoryError::from_insert)?;
        touch_conversation_tx(&mut tx, created.id, message.created_at).await?;
        let stored = insert_message_tx(&mut tx, message).await?;
        tx.commit().await?;

        created.touch(stored.created_at);
        Ok((created, stored))
    }

    async fn list_conversations_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>> {
        self.conversations.list_for_user(user_id).await
    }

    async fn append_message(&self, message: &Message) -> Result<Message> {
        let mut tx = self.begin().await?;

        // Touch first: locks the conversation row and detects a missing parent
        let touched =
            touch_conversation_tx(&mut tx, message.conversation_id, message.created_at).await?;
        if touched == 0 {
            tx.rollback().await?;
            return Err(Error::NotFound("Conversation not found".to_string()));
        }

        let stored = insert_message_tx(&mut tx, message).await?;
        tx.commit().await?;

        Ok(stored)
    }

    async fn latest_message(&self, conversation_id: Uuid) -> Result<Option<Message>> {
        self.messages.latest(conversation_id).await
    }

    async fn mark_read_and_list(
        &self,
        conversation_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<Vec<Message>> {
        let mut tx = self.begin().await?;
        // The UPDATE predicate is the Unread -> Read guard of ReadStateMachine
        let marked = mark_read_tx(&mut tx, conversation_id, viewer_id).await?;
        let messages = list_messages_tx(&mut tx, conversation_id).await?;
        tx.commit().await?;

        tracing::debug!(conversation_id = %conversation_id, marked, "Marked messages read");
        Ok(messages)
    }

    async fn count_unread(&self, conversation_id: Uuid, viewer_id: Uuid) -> Result<i64> {
        self.messages.count_unread(conversation_id, viewer_id).await
    }

    async fn count_unread_for_user(&self, user_id: Uuid) -> Result<i64> {
        self.messages.count_unread_for_user(user_id).await
    }
}
