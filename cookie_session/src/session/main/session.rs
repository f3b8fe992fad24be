use chrono::{DateTime, Utc};

use crate::config::AuthConfig;
use crate::session::errors::SessionError;
use crate::session::types::Session;
use crate::storage::SharedSessionStore;
use crate::utils::{gen_random_string, token_prefix};

/// How many fresh tokens `create` tries before giving up on a collision
pub const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Random bytes per session token
const TOKEN_BYTES: usize = 32;

/// Creates, validates and destroys sessions; owns the expiry policy
///
/// Cheap to clone: clones share the same store.
#[derive(Clone)]
pub struct SessionManager {
    store: SharedSessionStore,
    config: AuthConfig,
}

impl SessionManager {
    pub fn new(store: SharedSessionStore, config: AuthConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &SharedSessionStore {
        &self.store
    }

    /// Create a session for an already authenticated user
    ///
    /// # Arguments
    /// * `username` - The owner of the new session
    ///
    /// # Returns
    /// * `Result<Session, SessionError>` - The stored session; its `token` goes into the cookie
    pub async fn create(&self, username: &str) -> Result<Session, SessionError> {
        self.create_at(username, Utc::now()).await
    }

    #[tracing::instrument(skip(self, now))]
    pub(crate) async fn create_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        if username.is_empty() {
            return Err(SessionError::EmptyUsername);
        }

        let expires_at = now
            .checked_add_signed(self.config.session_duration)
            .ok_or(SessionError::ExpiryOutOfRange)?;
        let mut store = self.store.lock().await;

        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let session = Session {
                token: gen_random_string(TOKEN_BYTES)?,
                username: username.to_string(),
                created_at: now,
                expires_at,
            };

            if store.insert_if_absent(session.clone()).await? {
                tracing::info!(
                    "Session created for user '{}' (token prefix: {})",
                    username,
                    session.token_prefix()
                );
                return Ok(session);
            }

            tracing::warn!(
                "Token collision detected on attempt {}, regenerating",
                attempt
            );
        }

        tracing::error!(
            "Giving up on session for '{}' after {} token collisions",
            username,
            MAX_TOKEN_ATTEMPTS
        );
        Err(SessionError::TokenCollision(MAX_TOKEN_ATTEMPTS))
    }

    /// Resolve a token to its owning username
    ///
    /// Returns `Ok(None)` for an empty, unknown or expired token. An expired session is
    /// removed from the store by this call. `Err` means the store itself failed.
    pub async fn validate(&self, token: &str) -> Result<Option<String>, SessionError> {
        self.validate_at(token, Utc::now()).await
    }

    /// Like [`validate`](Self::validate) but returns the whole session record
    pub async fn validate_session(&self, token: &str) -> Result<Option<Session>, SessionError> {
        self.validate_session_at(token, Utc::now()).await
    }

    pub(crate) async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, SessionError> {
        Ok(self
            .validate_session_at(token, now)
            .await?
            .map(|session| session.username))
    }

    #[tracing::instrument(skip_all, fields(token_prefix = %token_prefix(token)))]
    pub(crate) async fn validate_session_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, SessionError> {
        if token.is_empty() {
            return Ok(None);
        }

        // Lookup and lazy deletion happen under one lock
        let mut store = self.store.lock().await;

        let Some(session) = store.get(token).await? else {
            tracing::debug!("No session found for token");
            return Ok(None);
        };

        if session.is_expired_at(now) {
            tracing::info!(
                "Session expired for token prefix {} - removing",
                session.token_prefix()
            );
            store.remove(token).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Remove a session; unknown tokens are a no-op
    pub async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            return Ok(());
        }

        let removed = self.store.lock().await.remove(token).await?;
        if let Some(session) = removed {
            tracing::info!(
                "Session destroyed for user '{}' (token prefix: {})",
                session.username,
                session.token_prefix()
            );
        }
        Ok(())
    }

    /// Remove every expired session and report how many were dropped
    ///
    /// Optional: validation already expires sessions lazily. This bounds the memory held
    /// by sessions nobody comes back for.
    pub async fn sweep_expired(&self) -> Result<usize, SessionError> {
        self.sweep_expired_at(Utc::now()).await
    }

    pub(crate) async fn sweep_expired_at(&self, now: DateTime<Utc>) -> Result<usize, SessionError> {
        let removed = self.store.lock().await.remove_expired(now).await?;
        if removed > 0 {
            tracing::info!("Swept {} expired sessions", removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::main::test_utils::{
        CollidingStore, OCCUPANT, UnavailableStore, insert_test_session, memory_manager,
        store_contains,
    };
    use crate::storage::shared;
    use chrono::Duration;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_create_validate_destroy_scenario() {
        let manager = memory_manager(Duration::hours(24));

        let session = manager.create("alice").await.unwrap();
        assert_eq!(
            manager.validate(&session.token).await.unwrap().as_deref(),
            Some("alice")
        );

        manager.destroy(&session.token).await.unwrap();
        assert_eq!(manager.validate(&session.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_sets_validity_window() {
        let manager = memory_manager(Duration::hours(24));
        let now = Utc::now();

        let session = manager.create_at("alice", now).await.unwrap();

        assert_eq!(session.username, "alice");
        assert_eq!(session.created_at, now);
        assert_eq!(session.expires_at, now + Duration::hours(24));
        assert!(session.expires_at > session.created_at);
        assert!(store_contains(&manager, &session.token).await);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_username() {
        let manager = memory_manager(Duration::hours(24));
        assert!(matches!(
            manager.create("").await,
            Err(SessionError::EmptyUsername)
        ));
    }

    #[tokio::test]
    async fn test_multiple_sessions_per_user_are_distinct() {
        let manager = memory_manager(Duration::hours(24));

        let first = manager.create("alice").await.unwrap();
        let second = manager.create("alice").await.unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(
            manager.validate(&first.token).await.unwrap().as_deref(),
            Some("alice")
        );
        assert_eq!(
            manager.validate(&second.token).await.unwrap().as_deref(),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn test_expiry_boundaries() {
        let manager = memory_manager(Duration::hours(1));
        let created_at = Utc::now();
        let session = manager.create_at("alice", created_at).await.unwrap();

        // Valid for created_at <= t <= expires_at
        for t in [
            created_at,
            created_at + Duration::minutes(30),
            session.expires_at,
        ] {
            assert_eq!(
                manager.validate_at(&session.token, t).await.unwrap().as_deref(),
                Some("alice"),
                "expected valid session at {t}"
            );
        }

        // Absent for t > expires_at, and the entry is reaped
        let after = session.expires_at + Duration::milliseconds(1);
        assert_eq!(manager.validate_at(&session.token, after).await.unwrap(), None);
        assert!(!store_contains(&manager, &session.token).await);

        // Once reaped it stays absent even for an earlier clock
        assert_eq!(
            manager.validate_at(&session.token, created_at).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_zero_duration_session_is_reaped_on_first_validation() {
        let manager = memory_manager(Duration::zero());
        let created_at = Utc::now();
        let session = manager.create_at("alice", created_at).await.unwrap();
        assert!(store_contains(&manager, &session.token).await);

        let later = created_at + Duration::milliseconds(1);
        assert_eq!(manager.validate_at(&session.token, later).await.unwrap(), None);
        assert!(!store_contains(&manager, &session.token).await);
    }

    #[tokio::test]
    async fn test_zero_duration_session_with_system_clock() {
        let manager = memory_manager(Duration::zero());
        let session = manager.create("alice").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        assert_eq!(manager.validate(&session.token).await.unwrap(), None);
        assert!(!store_contains(&manager, &session.token).await);
    }

    #[tokio::test]
    async fn test_unknown_token_is_absent_without_mutation() {
        let manager = memory_manager(Duration::hours(24));
        let existing = manager.create("alice").await.unwrap();

        assert_eq!(manager.validate("not-a-real-token").await.unwrap(), None);

        // The unrelated session is untouched
        assert!(store_contains(&manager, &existing.token).await);
        assert!(!store_contains(&manager, "not-a-real-token").await);
    }

    #[tokio::test]
    async fn test_empty_token_does_not_touch_store() {
        // An unreachable store proves no lookup happens
        let manager = SessionManager::new(shared(UnavailableStore), AuthConfig::default());
        assert_eq!(manager.validate("").await.unwrap(), None);
        assert!(manager.destroy("").await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_is_idempotent() {
        let manager = memory_manager(Duration::hours(24));
        let session = manager.create("alice").await.unwrap();

        let first = manager.validate(&session.token).await.unwrap();
        let second = manager.validate(&session.token).await.unwrap();

        assert_eq!(first, second);
        assert!(store_contains(&manager, &session.token).await);
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let manager = memory_manager(Duration::hours(24));
        let session = manager.create("alice").await.unwrap();
        let other = manager.create("bob").await.unwrap();

        manager.destroy(&session.token).await.unwrap();
        manager.destroy(&session.token).await.unwrap();
        manager.destroy("never-issued").await.unwrap();

        assert_eq!(manager.validate(&session.token).await.unwrap(), None);
        assert_eq!(
            manager.validate(&other.token).await.unwrap().as_deref(),
            Some("bob")
        );
    }

    #[tokio::test]
    async fn test_collision_is_retried_with_fresh_token() {
        let store = CollidingStore::new(2);
        let offered = store.offered();
        let manager = SessionManager::new(shared(store), AuthConfig::default());

        let session = manager.create("alice").await.unwrap();

        let offered = offered.lock().unwrap().clone();
        assert_eq!(offered.len(), 3);
        assert_eq!(offered.iter().collect::<HashSet<_>>().len(), 3);
        assert_eq!(offered.last(), Some(&session.token));
        assert_eq!(
            manager.validate(&session.token).await.unwrap().as_deref(),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn test_unrepresentable_expiry_is_an_error() {
        let manager = memory_manager(Duration::MAX);

        assert!(matches!(
            manager.create("alice").await,
            Err(SessionError::ExpiryOutOfRange)
        ));

        let far = memory_manager(Duration::days(365 * 300_000));
        assert!(matches!(
            far.create("alice").await,
            Err(SessionError::ExpiryOutOfRange)
        ));
    }

    #[tokio::test]
    async fn test_collision_exhaustion_is_fatal() {
        let store = CollidingStore::new(MAX_TOKEN_ATTEMPTS);
        let offered = store.offered();
        let manager = SessionManager::new(shared(store), AuthConfig::default());

        let result = manager.create("alice").await;

        assert!(matches!(
            result,
            Err(SessionError::TokenCollision(MAX_TOKEN_ATTEMPTS))
        ));
        let offered = offered.lock().unwrap().clone();
        assert_eq!(offered.len(), MAX_TOKEN_ATTEMPTS);
        assert_eq!(offered.iter().collect::<HashSet<_>>().len(), MAX_TOKEN_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_colliding_token_never_overwrites_existing_session() {
        let store = CollidingStore::new(1);
        let offered = store.offered();
        let manager = SessionManager::new(shared(store), AuthConfig::default());

        let session = manager.create("mallory").await.unwrap();

        let taken = offered.lock().unwrap()[0].clone();
        assert_ne!(session.token, taken);
        assert_eq!(
            manager.validate(&taken).await.unwrap().as_deref(),
            Some(OCCUPANT)
        );
        assert_eq!(
            manager.validate(&session.token).await.unwrap().as_deref(),
            Some("mallory")
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_not_unauthenticated() {
        let manager = SessionManager::new(shared(UnavailableStore), AuthConfig::default());

        assert!(matches!(
            manager.validate("some-token").await,
            Err(SessionError::Storage(_))
        ));
        assert!(matches!(
            manager.create("alice").await,
            Err(SessionError::Storage(_))
        ));
        assert!(matches!(
            manager.destroy("some-token").await,
            Err(SessionError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_sweep_expired_removes_only_expired() {
        let manager = memory_manager(Duration::hours(24));
        let now = Utc::now();
        insert_test_session(
            &manager,
            "old1",
            "alice",
            now - Duration::hours(48),
            Duration::hours(24),
        )
        .await;
        insert_test_session(
            &manager,
            "old2",
            "bob",
            now - Duration::hours(2),
            Duration::hours(1),
        )
        .await;
        let live = manager.create_at("carol", now).await.unwrap();

        let removed = manager.sweep_expired_at(now).await.unwrap();

        assert_eq!(removed, 2);
        assert!(!store_contains(&manager, "old1").await);
        assert!(!store_contains(&manager, "old2").await);
        assert!(store_contains(&manager, &live.token).await);
        assert_eq!(manager.sweep_expired_at(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_unique_tokens() {
        let manager = memory_manager(Duration::hours(24));

        let mut handles = vec![];
        for i in 0..32 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move {
                manager.create(&format!("user{i}")).await.unwrap()
            }));
        }

        let mut tokens = HashSet::new();
        for handle in handles {
            let session = handle.await.unwrap();
            assert_eq!(
                manager.validate(&session.token).await.unwrap(),
                Some(session.username.clone())
            );
            assert!(tokens.insert(session.token));
        }
        assert_eq!(tokens.len(), 32);
    }

    proptest! {
        /// Interleaved creates and destroys never leave two live sessions sharing a token
        #[test]
        fn test_live_tokens_are_unique(ops in proptest::collection::vec(any::<bool>(), 1..40)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            rt.block_on(async {
                let manager = memory_manager(Duration::hours(24));
                let mut live: Vec<String> = Vec::new();

                for create in ops {
                    if create || live.is_empty() {
                        let session = manager.create("alice").await.unwrap();
                        live.push(session.token);
                    } else {
                        let token = live.remove(0);
                        manager.destroy(&token).await.unwrap();
                    }
                }

                let unique: HashSet<&String> = live.iter().collect();
                prop_assert_eq!(unique.len(), live.len());
                for token in &live {
                    let owner = manager.validate(token).await.unwrap();
                    prop_assert_eq!(owner.as_deref(), Some("alice"));
                }
                Ok(())
            })?;
        }
    }
}
