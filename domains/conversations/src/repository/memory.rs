//! In-memory conversation store
//!
//! Holds every conversation and message behind one mutex, so each trait
//! call is atomic the same way a single database transaction is. Enforces
//! the one-conversation-per-triple rule like the database constraint does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use swapshop_common::{Error, Result};
use uuid::Uuid;

use super::store::ConversationStore;
use crate::domain::entities::{Conversation, Message};
use crate::domain::state::{ReadEvent, ReadStateMachine};

#[derive(Debug, Default)]
struct Inner {
    conversations: HashMap<Uuid, Conversation>,
    messages: Vec<Message>,
    next_sequence: i64,
}

impl Inner {
    fn push_message(&mut self, message: &Message) -> Message {
        self.next_sequence += 1;
        let mut stored = message.clone();
        stored.sequence = self.next_sequence;
        self.messages.push(stored.clone());
        stored
    }

    fn conversation_messages(&self, conversation_id: Uuid) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by_key(Message::order_key);
        messages
    }

    fn unread_for(&self, conversation_id: Uuid, viewer_id: Uuid) -> i64 {
        self.messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id && m.sender_id != viewer_id && !m.read)
            .count() as i64
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Internal("conversation store lock poisoned".to_string()))
    }

    /// Number of stored conversations
    pub fn conversation_count(&self) -> usize {
        self.lock().map(|inner| inner.conversations.len()).unwrap_or(0)
    }

    /// Number of stored messages across all conversations
    pub fn message_count(&self) -> usize {
        self.lock().map(|inner| inner.messages.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find_conversation(&self, id: Uuid) -> Result<Option<Conversation>> {
        Ok(self.lock()?.conversations.get(&id).cloned())
    }

    async fn find_by_participants(
        &self,
        buyer_id: Uuid,
        seller_id: Uuid,
        item_id: Option<i64>,
    ) -> Result<Option<Conversation>> {
        Ok(self
            .lock()?
            .conversations
            .values()
            .find(|c| c.matches(buyer_id, seller_id, item_id))
            .cloned())
    }

    async fn create_conversation_with_message(
        &self,
        conversation: &Conversation,
        message: &Message,
    ) -> Result<(Conversation, Message)> {
        let mut inner = self.lock()?;

        if message.conversation_id != conversation.id {
            return Err(Error::Internal(
                "Opening message belongs to another conversation".to_string(),
            ));
        }
        let duplicate = inner.conversations.contains_key(&conversation.id)
            || inner.conversations.values().any(|c| {
                c.matches(
                    conversation.buyer_id,
                    conversation.seller_id,
                    conversation.item_id,
                )
            });
        if duplicate {
            return Err(Error::Conflict("Conversation already exists".to_string()));
        }

        let mut created = conversation.clone();
        created.touch(message.created_at);
        inner.conversations.insert(created.id, created.clone());

        let stored = inner.push_message(message);
        Ok((created, stored))
    }

    async fn list_conversations_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>> {
        let mut convs: Vec<Conversation> = self
            .lock()?
            .conversations
            .values()
            .filter(|c| c.is_participant(user_id))
            .cloned()
            .collect();
        convs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(convs)
    }

    async fn append_message(&self, message: &Message) -> Result<Message> {
        let mut inner = self.lock()?;

        let conversation = inner
            .conversations
            .get_mut(&message.conversation_id)
            .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;
        conversation.touch(message.created_at);

        Ok(inner.push_message(message))
    }

    async fn latest_message(&self, conversation_id: Uuid) -> Result<Option<Message>> {
        Ok(self
            .lock()?
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .max_by_key(|m| m.order_key())
            .cloned())
    }

    async fn mark_read_and_list(
        &self,
        conversation_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<Vec<Message>> {
        let mut inner = self.lock()?;

        for message in inner
            .messages
            .iter_mut()
            .filter(|m| m.conversation_id == conversation_id && m.sender_id != viewer_id && !m.read)
        {
            ReadStateMachine::transition_for_viewer(
                message.read_state(),
                ReadEvent::MarkRead,
                message.sender_id,
                viewer_id,
            )?;
            message.read = true;
        }

        Ok(inner.conversation_messages(conversation_id))
    }

    async fn count_unread(&self, conversation_id: Uuid, viewer_id: Uuid) -> Result<i64> {
        Ok(self.lock()?.unread_for(conversation_id, viewer_id))
    }

    async fn count_unread_for_user(&self, user_id: Uuid) -> Result<i64> {
        let inner = self.lock()?;
        Ok(inner
            .conversations
            .values()
            .filter(|c| c.is_participant(user_id))
            .map(|c| inner.unread_for(c.id, user_id))
            .sum())
    }
}
