use subtle::ConstantTimeEq;

use super::errors::UserError;
use super::store::SharedCredentialStore;
use super::types::hash_password;

/// Checks username/password pairs against a credential store
#[derive(Clone)]
pub struct CredentialVerifier {
    store: SharedCredentialStore,
}

impl CredentialVerifier {
    pub fn new(store: SharedCredentialStore) -> Self {
        Self { store }
    }

    /// `Ok(true)` only when `username` exists and `password` hashes to its stored hash
    ///
    /// Unknown users and wrong passwords both give `Ok(false)`. `Err` means the store failed.
    #[tracing::instrument(skip(self, password))]
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, UserError> {
        if username.is_empty() || password.is_empty() {
            tracing::debug!("Empty username or password rejected");
            return Ok(false);
        }

        let Some(record) = self.store.get_credential(username).await? else {
            tracing::info!("Credential verification failed");
            return Ok(false);
        };

        let supplied = hash_password(password);
        let matches: bool = supplied
            .as_bytes()
            .ct_eq(record.password_hash.as_bytes())
            .into();

        if matches {
            tracing::info!("Credential verification succeeded");
        } else {
            tracing::info!("Credential verification failed");
        }
        Ok(matches)
    }
}
