//! Test utilities for session module tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::config::AuthConfig;
use crate::session::Session;
use crate::session::main::session::SessionManager;
use crate::storage::{InMemorySessionStore, SessionStore, StorageError, shared};

/// Owner of the sessions `CollidingStore` plants under refused tokens
pub(crate) const OCCUPANT: &str = "occupant";

/// Session store where the first `refusals` offered tokens turn out to be taken
///
/// Each refused token is occupied by a live session owned by [`OCCUPANT`], and every
/// offered token is recorded in order.
pub(crate) struct CollidingStore {
    inner: InMemorySessionStore,
    refusals: usize,
    offered: Arc<Mutex<Vec<String>>>,
}

impl CollidingStore {
    pub(crate) fn new(refusals: usize) -> Self {
        Self {
            inner: InMemorySessionStore::new(),
            refusals,
            offered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle on the offered-token log that outlives boxing the store
    pub(crate) fn offered(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.offered)
    }
}

#[async_trait]
impl SessionStore for CollidingStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn insert_if_absent(&mut self, session: Session) -> Result<bool, StorageError> {
        self.offered
            .lock()
            .expect("offered log")
            .push(session.token.clone());

        if self.refusals > 0 {
            self.refusals -= 1;
            let occupant = Session {
                username: OCCUPANT.to_string(),
                ..session.clone()
            };
            self.inner.insert_if_absent(occupant).await?;
        }
        self.inner.insert_if_absent(session).await
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StorageError> {
        self.inner.get(token).await
    }

    async fn remove(&mut self, token: &str) -> Result<Option<Session>, StorageError> {
        self.inner.remove(token).await
    }

    async fn remove_expired(&mut self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        self.inner.remove_expired(now).await
    }
}

/// Session store whose backend is always unreachable
pub(crate) struct UnavailableStore;

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn init(&self) -> Result<(), StorageError> {
        Err(StorageError::Storage("connection refused".to_string()))
    }

    async fn insert_if_absent(&mut self, _session: Session) -> Result<bool, StorageError> {
        Err(StorageError::Storage("connection refused".to_string()))
    }

    async fn get(&self, _token: &str) -> Result<Option<Session>, StorageError> {
        Err(StorageError::Storage("connection refused".to_string()))
    }

    async fn remove(&mut self, _token: &str) -> Result<Option<Session>, StorageError> {
        Err(StorageError::Storage("connection refused".to_string()))
    }

    async fn remove_expired(&mut self, _now: DateTime<Utc>) -> Result<usize, StorageError> {
        Err(StorageError::Storage("connection refused".to_string()))
    }
}

/// Session manager over a fresh in-memory store
pub(crate) fn memory_manager(duration: Duration) -> SessionManager {
    SessionManager::new(
        shared(InMemorySessionStore::new()),
        AuthConfig::default().with_session_duration(duration),
    )
}

/// Insert a session directly, bypassing the manager
pub(crate) async fn insert_test_session(
    manager: &SessionManager,
    token: &str,
    username: &str,
    created_at: DateTime<Utc>,
    ttl: Duration,
) {
    let session = Session {
        token: token.to_string(),
        username: username.to_string(),
        created_at,
        expires_at: created_at + ttl,
    };
    let inserted = manager
        .store()
        .lock()
        .await
        .insert_if_absent(session)
        .await
        .expect("insert test session");
    assert!(inserted, "test session token already present: {token}");
}

/// Whether the store currently holds `token`
pub(crate) async fn store_contains(manager: &SessionManager, token: &str) -> bool {
    manager
        .store()
        .lock()
        .await
        .get(token)
        .await
        .expect("store lookup")
        .is_some()
}
