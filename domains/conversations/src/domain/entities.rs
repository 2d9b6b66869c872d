//! Domain entities for the Conversations domain
//!
//! A conversation links one buyer and one seller, optionally scoped to a
//! listing. Messages are append-only; the only mutable message field is the
//! `read` flag, which moves false to true exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use swapshop_common::{Error, Result};

use super::state::ReadState;

/// Maximum message length in characters (CHECK char_length(content) <= 5000)
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Which side of a conversation a user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Buyer,
    Seller,
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipantRole::Buyer => write!(f, "buyer"),
            ParticipantRole::Seller => write!(f, "seller"),
        }
    }
}

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub item_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation between two distinct users
    pub fn new(buyer_id: Uuid, seller_id: Uuid, item_id: Option<i64>) -> Result<Self> {
        if buyer_id == seller_id {
            return Err(Error::Validation(
                "Buyer and seller must be different users".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Conversation {
            id: Uuid::new_v4(),
            buyer_id,
            seller_id,
            item_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Role of `user_id` in this conversation, if they take part in it
    pub fn role_of(&self, user_id: Uuid) -> Option<ParticipantRole> {
        if user_id == self.buyer_id {
            Some(ParticipantRole::Buyer)
        } else if user_id == self.seller_id {
            Some(ParticipantRole::Seller)
        } else {
            None
        }
    }

    #[mutants::skip] // Delegates to role_of()
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.role_of(user_id).is_some()
    }

    /// The participant on the other side from `user_id`
    pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
        self.role_of(user_id).map(|role| match role {
            ParticipantRole::Buyer => self.seller_id,
            ParticipantRole::Seller => self.buyer_id,
        })
    }

    /// Require `user_id` to be a participant, returning their role
    pub fn ensure_participant(&self, user_id: Uuid) -> Result<ParticipantRole> {
        self.role_of(user_id).ok_or_else(|| {
            Error::Forbidden("You are not part of this conversation".to_string())
        })
    }

    /// Advance `updated_at` to `at`, never moving it backwards
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.updated_at {
            self.updated_at = at;
        }
    }

    /// Whether this conversation belongs to the `(buyer, seller, item)` triple
    pub fn matches(&self, buyer_id: Uuid, seller_id: Uuid, item_id: Option<i64>) -> bool {
        self.buyer_id == buyer_id && self.seller_id == seller_id && self.item_id == item_id
    }
}

/// Message entity
///
/// `sequence` is assigned by the store on insert and breaks ties between
/// messages that share a `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub read: bool,
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new unread message; the store assigns `sequence`
    pub fn new(conversation_id: Uuid, sender_id: Uuid, content: String) -> Result<Self> {
        Self::validate_content(&content)?;

        Ok(Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content,
            read: false,
            sequence: 0,
            created_at: Utc::now(),
        })
    }

    /// Validate message content (non-blank, at most `MAX_MESSAGE_LENGTH` chars)
    pub fn validate_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }
        if content.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(Error::Validation(format!(
                "Message content must be at most {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }
        Ok(())
    }

    pub fn read_state(&self) -> ReadState {
        if self.read {
            ReadState::Read
        } else {
            ReadState::Unread
        }
    }

    /// Ordering key inside a conversation
    pub fn order_key(&self) -> (DateTime<Utc>, i64) {
        (self.created_at, self.sequence)
    }
}
