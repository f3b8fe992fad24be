use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;

use crate::session::Session;
use crate::storage::errors::StorageError;

use super::types::{RedisSessionStore, SessionStore};

const SESSION_PREFIX: &str = "session";

impl RedisSessionStore {
    pub fn open(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    fn make_key(token: &str) -> String {
        format!("{SESSION_PREFIX}:{token}")
    }

    /// Redis rejects a zero expiry, so the key lives for at least one second.
    /// Expiry is still enforced against `expires_at` by the session manager.
    fn ttl_secs(session: &Session) -> i64 {
        (session.expires_at - session.created_at)
            .num_seconds()
            .max(1)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        // Verify the connection works
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    async fn insert_if_absent(&mut self, session: Session) -> Result<bool, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(&session.token);
        let ttl = Self::ttl_secs(&session);
        let value = serde_json::to_string(&session)?;

        // SET NX EX is a single atomic check-and-set
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await?;

        Ok(reply.is_some())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let value: Option<String> = conn.get(Self::make_key(token)).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    async fn remove(&mut self, token: &str) -> Result<Option<Session>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let value: Option<String> = redis::cmd("GETDEL")
            .arg(Self::make_key(token))
            .query_async(&mut conn)
            .await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    async fn remove_expired(&mut self, _now: DateTime<Utc>) -> Result<usize, StorageError> {
        // Keys carry their own TTL; redis evicts them without our help
        tracing::debug!("Skipping sweep for redis session store");
        Ok(0)
    }
}
