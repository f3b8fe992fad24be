use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::userdb::errors::UserError;
use crate::userdb::types::CredentialRecord;

/// Credential store handle shared by every verifier
pub type SharedCredentialStore = Arc<dyn CredentialStore>;

/// Read-only view of provisioned credentials
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Prepare the backend (create tables, check connectivity)
    async fn init(&self) -> Result<(), UserError>;

    async fn get_credential(&self, username: &str)
    -> Result<Option<CredentialRecord>, UserError>;
}

pub struct InMemoryCredentialStore {
    pub(super) records: HashMap<String, CredentialRecord>,
}

pub struct SqliteCredentialStore {
    pub(super) pool: Pool<Sqlite>,
}
