//! Message retrieval and unread counts

use std::collections::HashMap;

use swapshop_common::{Error, Result};
use uuid::Uuid;

use super::ConversationService;
use crate::domain::views::{MessageWithSender, PublicProfile, UnreadCount};

impl ConversationService {
    /// Full message history for a participant. Messages from the other
    /// participant are marked read in one batch before the history is read
    /// back, so the returned flags already reflect this view. Nothing that
    /// can fail runs after the batch commits.
    pub async fn get_messages(
        &self,
        conversation_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<Vec<MessageWithSender>> {
        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;
        conversation.ensure_participant(viewer_id)?;

        let mut senders: HashMap<Uuid, Option<PublicProfile>> = HashMap::with_capacity(2);
        for id in [conversation.buyer_id, conversation.seller_id] {
            let profile = self.directory.find_user(id).await?.map(|u| u.public());
            senders.insert(id, profile);
        }

        let messages = self
            .store
            .mark_read_and_list(conversation_id, viewer_id)
            .await?;

        Ok(messages
            .into_iter()
            .map(|message| MessageWithSender {
                sender: senders.get(&message.sender_id).cloned().flatten(),
                message,
            })
            .collect())
    }

    /// Unread messages addressed to `user_id` across all their conversations
    pub async fn get_unread_count(&self, user_id: Uuid) -> Result<UnreadCount> {
        let count = self.store.count_unread_for_user(user_id).await?;
        Ok(UnreadCount { count })
    }
}
