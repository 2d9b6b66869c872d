//! User and item lookups
//!
//! Users and listings are owned by other services. This domain only reads
//! them: from their tables in PostgreSQL, or from a map in tests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use sqlx::PgPool;
use swapshop_common::{Error, Result};
use uuid::Uuid;

use crate::domain::views::{ItemSummary, UserProfile};

#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserProfile>>;

    async fn find_item(&self, id: i64) -> Result<Option<ItemSummary>>;
}

/// Read-model lookups against the shared `users` and `items` tables
#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let user = sqlx::query_as::<_, UserProfile>(
            "SELECT id, name, email, image FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_item(&self, id: i64) -> Result<Option<ItemSummary>> {
        let item = sqlx::query_as::<_, ItemSummary>(
            "SELECT id, name, image_url FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }
}

#[derive(Debug, Default)]
struct Entries {
    users: HashMap<Uuid, UserProfile>,
    items: HashMap<i64, ItemSummary>,
}

/// Directory backed by in-process maps
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: UserProfile) {
        if let Ok(mut entries) = self.entries.write() {
            entries.users.insert(user.id, user);
        }
    }

    pub fn add_item(&self, item: ItemSummary) {
        if let Ok(mut entries) = self.entries.write() {
            entries.items.insert(item.id, item);
        }
    }

    pub fn remove_item(&self, id: i64) {
        if let Ok(mut entries) = self.entries.write() {
            entries.items.remove(&id);
        }
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Internal("directory lock poisoned".to_string())
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.entries.read().map_err(poisoned)?.users.get(&id).cloned())
    }

    async fn find_item(&self, id: i64) -> Result<Option<ItemSummary>> {
        Ok(self.entries.read().map_err(poisoned)?.items.get(&id).cloned())
    }
}
