//! Conversations domain: buyer–seller threads about marketplace listings
//!
//! Find-or-create conversations per `(buyer, seller, item)`, append-only
//! message histories with per-message read state, unread badge counts, and
//! a seller email when a buyer first makes contact.

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Conversation, Message, ParticipantRole, MAX_MESSAGE_LENGTH};
pub use domain::state::{ReadEvent, ReadState, ReadStateMachine, StateError};
pub use domain::views::{
    ConversationSummary, ItemSummary, MessageWithSender, PublicProfile, StartedConversation,
    UnreadCount, UserProfile,
};

// Re-export repository types
pub use repository::{
    ConversationRepository, ConversationStore, ConversationsRepositories, Directory,
    InMemoryConversationStore, InMemoryDirectory, MessageRepository, PgDirectory,
};

// Re-export service types
pub use service::{ConversationService, ConversationStartedNotice, NotificationHook};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
