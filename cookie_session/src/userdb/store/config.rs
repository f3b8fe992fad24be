use std::sync::Arc;

use super::types::{
    CredentialStore, InMemoryCredentialStore, SharedCredentialStore, SqliteCredentialStore,
};
use crate::config::CredentialStoreKind;
use crate::userdb::errors::UserError;
use crate::userdb::types::CredentialRecord;

/// Build and initialize the configured credential store, seeded with `seed`
pub async fn build_credential_store(
    kind: &CredentialStoreKind,
    seed: Vec<CredentialRecord>,
) -> Result<SharedCredentialStore, UserError> {
    let store: SharedCredentialStore = match kind {
        CredentialStoreKind::Memory => Arc::new(InMemoryCredentialStore::from_records(seed)),
        CredentialStoreKind::Sqlite { url } => {
            let store = SqliteCredentialStore::open(url)?;
            store
                .init()
                .await
                .inspect_err(|e| tracing::error!("Failed to initialize credential store: {e}"))?;
            for record in &seed {
                store.provision(record).await?;
            }
            Arc::new(store)
        }
    };

    tracing::info!("Credential store ready: {:?}", kind);
    Ok(store)
}
