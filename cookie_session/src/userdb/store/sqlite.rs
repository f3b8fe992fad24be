use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::types::{CredentialStore, SqliteCredentialStore};
use crate::userdb::errors::UserError;
use crate::userdb::types::CredentialRecord;

const DB_TABLE_CREDENTIALS: &str = "credentials";

impl SqliteCredentialStore {
    /// Open a lazily connected pool for `url`
    ///
    /// The pool holds a single connection that is never recycled, so `sqlite::memory:`
    /// keeps one database for the life of the store.
    pub fn open(url: &str) -> Result<Self, UserError> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_lazy_with(opts);
        Ok(Self { pool })
    }

    /// Insert or replace a credential record
    #[tracing::instrument(skip(self, record), fields(username = %record.username))]
    pub async fn provision(&self, record: &CredentialRecord) -> Result<(), UserError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {DB_TABLE_CREDENTIALS} (username, password_hash)
            VALUES (?, ?)
            ON CONFLICT (username) DO UPDATE SET
                password_hash = excluded.password_hash
            "#
        ))
        .bind(&record.username)
        .bind(&record.password_hash)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Credential provisioned");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn init(&self) -> Result<(), UserError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {DB_TABLE_CREDENTIALS} (
                username TEXT PRIMARY KEY NOT NULL,
                password_hash TEXT NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_credential(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, UserError> {
        let result = sqlx::query_as::<_, CredentialRecord>(&format!(
            r#"
            SELECT username, password_hash FROM {DB_TABLE_CREDENTIALS} WHERE username = ?
            "#
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(UserError::from);

        if let Err(e) = &result {
            tracing::error!(error = %e, "Credential lookup failed");
        }
        result
    }
}
