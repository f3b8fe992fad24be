use http::HeaderMap;

use super::errors::CoordinationError;
use super::types::{LoginOutcome, LoginRejection};
use crate::session::{CookieSync, Halt, IdentitySlot};
use crate::userdb::CredentialVerifier;

/// Login and logout orchestration for the rendering layer
#[derive(Clone)]
pub struct AuthCoordinator {
    verifier: CredentialVerifier,
    sync: CookieSync,
}

impl AuthCoordinator {
    pub fn new(verifier: CredentialVerifier, sync: CookieSync) -> Self {
        Self { verifier, sync }
    }

    pub fn sync(&self) -> &CookieSync {
        &self.sync
    }

    /// Handle a submitted login form
    pub async fn login(
        &self,
        slot: &mut IdentitySlot,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, CoordinationError> {
        if username.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::Rejected(LoginRejection::MissingFields));
        }

        if !self.verifier.verify(username, password).await? {
            tracing::warn!("Failed login attempt for username: {}", username);
            return Ok(LoginOutcome::Rejected(LoginRejection::InvalidCredentials));
        }

        let halt = self.sync.login(slot, username).await?;
        tracing::info!("User '{}' logged in", username);
        Ok(LoginOutcome::Halt(halt))
    }

    pub async fn logout(&self, slot: &mut IdentitySlot) -> Result<Halt, CoordinationError> {
        Ok(self.sync.logout(slot).await?)
    }

    /// Auth gate: populate `slot` from the request cookie if it is still empty
    pub async fn restore(
        &self,
        slot: &mut IdentitySlot,
        headers: &HeaderMap,
    ) -> Result<(), CoordinationError> {
        Ok(self.sync.restore(slot, headers).await?)
    }
}
