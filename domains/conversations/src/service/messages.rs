//! Appending messages to an existing conversation

use swapshop_common::{Error, Result};
use uuid::Uuid;

use super::ConversationService;
use crate::domain::entities::Message;

impl ConversationService {
    /// Post a message as `sender_id`, who must be the buyer or the seller
    pub async fn send_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: String,
    ) -> Result<Message> {
        Message::validate_content(&content)?;

        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;
        conversation.ensure_participant(sender_id)?;

        let message = Message::new(conversation_id, sender_id, content)?;
        let stored = self.store.append_message(&message).await?;

        tracing::debug!(
            conversation_id = %conversation_id,
            message_id = %stored.id,
            sequence = stored.sequence,
            "Message sent"
        );
        Ok(stored)
    }
}
