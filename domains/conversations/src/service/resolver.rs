//! Find-or-create a conversation for a `(buyer, seller, item)` triple

use swapshop_common::{Error, Result};
use uuid::Uuid;

use super::notify::ConversationStartedNotice;
use super::ConversationService;
use crate::domain::entities::{Conversation, Message};
use crate::domain::views::{ItemSummary, StartedConversation, UserProfile};

/// Participants and listing resolved before anything is written
struct Parties {
    buyer: UserProfile,
    seller: UserProfile,
    item: Option<ItemSummary>,
}

impl ConversationService {
    /// Contact a seller, reusing the conversation for this exact triple when
    /// one exists. Only the call that creates the conversation notifies the
    /// seller.
    pub async fn start_conversation(
        &self,
        buyer_id: Uuid,
        seller_id: Uuid,
        item_id: Option<i64>,
        initial_message: String,
    ) -> Result<StartedConversation> {
        if buyer_id == seller_id {
            return Err(Error::Validation(
                "You cannot start a conversation with yourself".to_string(),
            ));
        }
        Message::validate_content(&initial_message)?;

        let parties = self.resolve_parties(buyer_id, seller_id, item_id).await?;
        let (conversation, message, created) = self
            .find_or_create(buyer_id, seller_id, item_id, initial_message)
            .await?;

        if created {
            tracing::info!(
                conversation_id = %conversation.id,
                buyer_id = %buyer_id,
                seller_id = %seller_id,
                item_id = ?item_id,
                "Conversation started"
            );
            let notice = ConversationStartedNotice {
                seller_email: parties.seller.email.clone(),
                buyer_name: parties.buyer.display_name().to_string(),
                item_name: parties.item.and_then(|i| i.name),
                item_id,
                initial_message: message.content.clone(),
            };
            self.notifier.conversation_started(&notice).await;
        }

        Ok(StartedConversation {
            conversation,
            message,
            created,
        })
    }

    async fn resolve_parties(
        &self,
        buyer_id: Uuid,
        seller_id: Uuid,
        item_id: Option<i64>,
    ) -> Result<Parties> {
        let buyer = self
            .directory
            .find_user(buyer_id)
            .await?
            .ok_or_else(|| Error::NotFound("Buyer not found".to_string()))?;
        let seller = self
            .directory
            .find_user(seller_id)
            .await?
            .ok_or_else(|| Error::NotFound("Seller not found".to_string()))?;
        let item = match item_id {
            Some(id) => Some(
                self.directory
                    .find_item(id)
                    .await?
                    .ok_or_else(|| Error::NotFound("Item not found".to_string()))?,
            ),
            None => None,
        };

        Ok(Parties {
            buyer,
            seller,
            item,
        })
    }

    /// Stores the message on the triple's conversation, creating it if
    /// needed. A new conversation and its opening message are written
    /// together. The flag tells whether this call created the conversation.
    async fn find_or_create(
        &self,
        buyer_id: Uuid,
        seller_id: Uuid,
        item_id: Option<i64>,
        content: String,
    ) -> Result<(Conversation, Message, bool)> {
        if let Some(existing) = self
            .store
            .find_by_participants(buyer_id, seller_id, item_id)
            .await?
        {
            let (conversation, message) = self.append_to(existing, buyer_id, content).await?;
            return Ok((conversation, message, false));
        }

        let candidate = Conversation::new(buyer_id, seller_id, item_id)?;
        let opening = Message::new(candidate.id, buyer_id, content)?;
        match self
            .store
            .create_conversation_with_message(&candidate, &opening)
            .await
        {
            Ok((conversation, message)) => Ok((conversation, message, true)),
            Err(Error::Conflict(_)) => {
                // Lost the insert race; the winner's row is now visible
                tracing::debug!(
                    buyer_id = %buyer_id,
                    seller_id = %seller_id,
                    item_id = ?item_id,
                    "Conversation insert conflicted, reusing existing"
                );
                let existing = self
                    .store
                    .find_by_participants(buyer_id, seller_id, item_id)
                    .await?
                    .ok_or_else(|| {
                        Error::Internal("Conversation conflict without a visible row".to_string())
                    })?;
                let (conversation, message) =
                    self.append_to(existing, buyer_id, opening.content).await?;
                Ok((conversation, message, false))
            }
            Err(e) => Err(e),
        }
    }

    async fn append_to(
        &self,
        mut conversation: Conversation,
        sender_id: Uuid,
        content: String,
    ) -> Result<(Conversation, Message)> {
        let message = Message::new(conversation.id, sender_id, content)?;
        let message = self.store.append_message(&message).await?;
        conversation.touch(message.created_at);
        Ok((conversation, message))
    }
}
