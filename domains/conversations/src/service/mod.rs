//! Conversation services
//!
//! `ConversationService` is the entry point for every operation of this
//! domain. Each method takes the acting user id explicitly; the HTTP layer
//! derives it from the verified session token.
//!
//! The operations are split by concern:
//! - [`resolver`]: find-or-create a conversation for a buyer, seller and item
//! - [`messages`]: append messages
//! - [`read_state`]: message retrieval (marks read) and unread counts
//! - [`listing`]: conversation list and detail views
//! - [`notify`]: the seller notification fired on conversation creation

pub mod listing;
pub mod messages;
pub mod notify;
pub mod read_state;
pub mod resolver;

use std::sync::Arc;

use sqlx::PgPool;
use swapshop_email::EmailService;

use crate::repository::{ConversationStore, ConversationsRepositories, Directory, PgDirectory};

pub use notify::{ConversationStartedNotice, NotificationHook};

#[derive(Clone)]
pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
    directory: Arc<dyn Directory>,
    notifier: NotificationHook,
}

impl ConversationService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        directory: Arc<dyn Directory>,
        notifier: NotificationHook,
    ) -> Self {
        Self {
            store,
            directory,
            notifier,
        }
    }

    /// Service backed by PostgreSQL for both storage and directory lookups
    pub fn postgres(pool: PgPool, email: Arc<dyn EmailService>) -> Self {
        Self::new(
            Arc::new(ConversationsRepositories::new(pool.clone())),
            Arc::new(PgDirectory::new(pool)),
            NotificationHook::new(email),
        )
    }
}
