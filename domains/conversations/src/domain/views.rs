//! Read-side shapes: external users and items, and the annotated views
//! returned by listing and message retrieval.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::{Conversation, Message, ParticipantRole};

/// Name used in notifications when a buyer has not set a display name
pub const FALLBACK_DISPLAY_NAME: &str = "A SwapShop user";

/// Full user record as seen by this domain (includes email, never serialized)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
    }

    pub fn public(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

/// Profile fields visible to other users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Listing fields needed to render a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemSummary {
    pub id: i64,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// One entry of a user's conversation list
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub role: ParticipantRole,
    pub other_user: Option<PublicProfile>,
    pub item: Option<ItemSummary>,
    pub latest_message: Option<Message>,
    pub unread_count: i64,
}

/// Message annotated with its sender's public profile
#[derive(Debug, Clone, Serialize)]
pub struct MessageWithSender {
    #[serde(flatten)]
    pub message: Message,
    pub sender: Option<PublicProfile>,
}

/// Result of `start_conversation`
#[derive(Debug, Clone, Serialize)]
pub struct StartedConversation {
    pub conversation: Conversation,
    pub message: Message,
    /// Whether this call created the conversation
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: i64,
}
