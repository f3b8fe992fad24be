use headers::HeaderMapExt;
use http::HeaderMap;

use crate::session::errors::SessionError;
use crate::session::types::{CookieInstruction, Halt, Identity, IdentitySlot, SyncPhase};
use crate::utils::token_prefix;

use super::session::SessionManager;

/// Keeps the client-held cookie and the server-side session table in step
///
/// Reads come straight from the request's `Cookie` header. Writes are returned as a
/// [`Halt`]: the caller delivers the cookie instruction and stops rendering, and the
/// browser's next request is the fresh pass that re-derives identity from the cookie.
#[derive(Clone)]
pub struct CookieSync {
    manager: SessionManager,
}

impl CookieSync {
    pub fn new(manager: SessionManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn cookie_name(&self) -> &str {
        &self.manager.config().cookie_name
    }

    /// Read the session token from the request headers, synchronously
    ///
    /// A missing, empty or undecodable cookie is treated as no token.
    pub fn read_token(&self, headers: &HeaderMap) -> Option<String> {
        let Some(cookies) = headers.typed_get::<headers::Cookie>() else {
            tracing::debug!("No cookie header found");
            return None;
        };

        let token = cookies
            .get(self.cookie_name())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        if token.is_none() {
            tracing::debug!("No session cookie '{}' found in cookies", self.cookie_name());
        }
        token
    }

    /// Read path: cookie → session manager → identity
    ///
    /// A cookie naming no live session resolves to `Ok(None)` and is logged, never raised.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, SessionError> {
        let Some(token) = self.read_token(headers) else {
            return Ok(None);
        };

        match self.manager.validate(&token).await? {
            Some(username) => Ok(Some(Identity { username, token })),
            None => {
                tracing::warn!(
                    "Cookie present but invalid/expired (prefix: {}) - ignoring",
                    token_prefix(&token)
                );
                Ok(None)
            }
        }
    }

    /// Auth gate for a pass: fill an empty slot from the cookie
    ///
    /// A slot that already holds an identity is left as it is.
    pub async fn restore(
        &self,
        slot: &mut IdentitySlot,
        headers: &HeaderMap,
    ) -> Result<(), SessionError> {
        if slot.is_authenticated() {
            return Ok(());
        }

        if let Some(identity) = self.resolve(headers).await? {
            tracing::info!(
                phase = ?SyncPhase::FreshPass,
                "Session restored from cookie for user '{}' (token prefix: {})",
                identity.username,
                token_prefix(&identity.token)
            );
            slot.set(identity);
        }
        Ok(())
    }

    /// Write path for login
    ///
    /// Creates the session and sets the slot before the cookie write is issued, so the
    /// rest of this flow already sees the user as authenticated.
    pub async fn login(
        &self,
        slot: &mut IdentitySlot,
        username: &str,
    ) -> Result<Halt, SessionError> {
        let session = self.manager.create(username).await?;

        slot.set(Identity {
            username: session.username.clone(),
            token: session.token.clone(),
        });
        tracing::debug!(phase = ?SyncPhase::IdentitySet, "Identity set for '{}'", username);

        let instruction = CookieInstruction::Set {
            name: self.cookie_name().to_string(),
            value: session.token,
            expires_at: session.expires_at,
        };
        Ok(Halt::new(instruction, self.manager.config().cookie_secure))
    }

    /// Write path for logout
    ///
    /// Destroys the server-side session first; the slot is only cleared once that succeeded.
    pub async fn logout(&self, slot: &mut IdentitySlot) -> Result<Halt, SessionError> {
        if let Some(token) = slot.token() {
            self.manager.destroy(token).await?;
        }

        if let Some(identity) = slot.clear() {
            tracing::info!("Logout: user '{}' signed out", identity.username);
        }

        let instruction = CookieInstruction::Delete {
            name: self.cookie_name().to_string(),
        };
        Ok(Halt::new(instruction, self.manager.config().cookie_secure))
    }
}
