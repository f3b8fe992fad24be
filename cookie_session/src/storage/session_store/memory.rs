use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::session::Session;
use crate::storage::errors::StorageError;

use super::types::{InMemorySessionStore, SessionStore};

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entry: HashMap::new(),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn insert_if_absent(&mut self, session: Session) -> Result<bool, StorageError> {
        match self.entry.entry(session.token.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(true)
            }
        }
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StorageError> {
        Ok(self.entry.get(token).cloned())
    }

    async fn remove(&mut self, token: &str) -> Result<Option<Session>, StorageError> {
        Ok(self.entry.remove(token))
    }

    async fn remove_expired(&mut self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        let before = self.entry.len();
        self.entry.retain(|_, session| !session.is_expired_at(now));
        Ok(before - self.entry.len())
    }
}
