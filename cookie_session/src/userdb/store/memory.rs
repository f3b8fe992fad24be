use std::collections::HashMap;

use async_trait::async_trait;

use super::types::{CredentialStore, InMemoryCredentialStore};
use crate::userdb::errors::UserError;
use crate::userdb::types::CredentialRecord;

impl InMemoryCredentialStore {
    /// Build a store holding `records`
    ///
    /// A later record replaces an earlier one with the same username.
    pub fn from_records(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        let records: HashMap<String, CredentialRecord> = records
            .into_iter()
            .map(|record| (record.username.clone(), record))
            .collect();
        tracing::info!("Creating in-memory credential store with {} records", records.len());
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn init(&self) -> Result<(), UserError> {
        Ok(())
    }

    async fn get_credential(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, UserError> {
        Ok(self.records.get(username).cloned())
    }
}
