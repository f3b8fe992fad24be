use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::Session;
use crate::storage::errors::StorageError;

/// Session table shared by every client flow in the process
///
/// One coarse lock guards the whole store; every operation on it is O(1) except the sweep.
pub type SharedSessionStore = Arc<Mutex<Box<dyn SessionStore>>>;

pub struct InMemorySessionStore {
    pub(super) entry: HashMap<String, Session>,
}

pub struct RedisSessionStore {
    pub(super) client: redis::Client,
}

/// Backing table for sessions keyed by token
///
/// Only the session manager talks to this trait; implement it to plug in a durable store.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Insert a session unless its token is already taken.
    /// Returns true if the session was stored, false if the token already existed.
    async fn insert_if_absent(&mut self, session: Session) -> Result<bool, StorageError>;

    /// Look a session up by token.
    async fn get(&self, token: &str) -> Result<Option<Session>, StorageError>;

    /// Remove a session, returning it if it was present.
    async fn remove(&mut self, token: &str) -> Result<Option<Session>, StorageError>;

    /// Remove every session whose `expires_at` is before `now`.
    /// Returns the number of removed sessions.
    async fn remove_expired(&mut self, now: DateTime<Utc>) -> Result<usize, StorageError>;
}

/// Wrap a store for sharing between the session manager and background tasks
pub fn shared(store: impl SessionStore) -> SharedSessionStore {
    Arc::new(Mutex::new(Box::new(store)))
}
