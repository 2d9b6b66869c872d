//! Repository implementations for Conversations domain

pub mod conversations;
pub mod directory;
pub mod memory;
pub mod messages;
pub mod store;
pub mod transactions;

use sqlx::{PgPool, Postgres, Transaction};

pub use conversations::ConversationRepository;
pub use directory::{Directory, InMemoryDirectory, PgDirectory};
pub use memory::InMemoryConversationStore;
pub use messages::MessageRepository;
pub use store::ConversationStore;

/// Combined repository access for the Conversations domain
#[derive(Clone)]
pub struct ConversationsRepositories {
    pool: PgPool,
    pub conversations: ConversationRepository,
    pub messages: MessageRepository,
}

impl ConversationsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            conversations: ConversationRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}
