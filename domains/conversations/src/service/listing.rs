//! Conversation list and detail views. Read-only.

use swapshop_common::{Error, Result};
use uuid::Uuid;

use super::ConversationService;
use crate::domain::entities::Conversation;
use crate::domain::views::ConversationSummary;

impl ConversationService {
    /// Every conversation `user_id` takes part in, freshest first
    pub async fn list_conversations(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>> {
        let conversations = self.store.list_conversations_for_user(user_id).await?;

        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            summaries.push(self.summarize(conversation, user_id).await?);
        }
        Ok(summaries)
    }

    /// One conversation as its participant `viewer_id` sees it in the list.
    /// Does not change read state.
    pub async fn get_conversation(
        &self,
        conversation_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<ConversationSummary> {
        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

        self.summarize(conversation, viewer_id).await
    }

    async fn summarize(
        &self,
        conversation: Conversation,
        viewer_id: Uuid,
    ) -> Result<ConversationSummary> {
        let role = conversation.ensure_participant(viewer_id)?;

        let other_user = match conversation.other_participant(viewer_id) {
            Some(other_id) => self
                .directory
                .find_user(other_id)
                .await?
                .map(|u| u.public()),
            None => None,
        };
        // A listing removed after the conversation began simply drops out
        let item = match conversation.item_id {
            Some(item_id) => self.directory.find_item(item_id).await?,
            None => None,
        };
        let latest_message = self.store.latest_message(conversation.id).await?;
        let unread_count = self.store.count_unread(conversation.id, viewer_id).await?;

        Ok(ConversationSummary {
            conversation,
            role,
            other_user,
            item,
            latest_message,
            unread_count,
        })
    }
}
