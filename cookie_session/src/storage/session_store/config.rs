use crate::config::SessionStoreKind;
use crate::storage::errors::StorageError;

use super::types::{InMemorySessionStore, RedisSessionStore, SessionStore, SharedSessionStore};

/// Build and initialize the session store selected by configuration
pub async fn build_session_store(
    kind: &SessionStoreKind,
) -> Result<SharedSessionStore, StorageError> {
    let store: Box<dyn SessionStore> = match kind {
        SessionStoreKind::Memory => Box::new(InMemorySessionStore::new()),
        SessionStoreKind::Redis { url } => Box::new(RedisSessionStore::open(url)?),
    };

    // Fail at start-up rather than on the first login
    store.init().await.inspect_err(|e| {
        tracing::error!("Failed to initialize session store: {}", e);
    })?;

    tracing::info!("Connected to session store: {:?}", kind);

    Ok(std::sync::Arc::new(tokio::sync::Mutex::new(store)))
}
