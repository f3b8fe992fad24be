use chrono::{DateTime, Utc};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::session::errors::SessionError;
use crate::utils::{format_set_cookie, header_set_cookie, token_prefix};

/// Server-side record binding a token to its owner and validity window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is valid up to and including `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn token_prefix(&self) -> &str {
        token_prefix(&self.token)
    }
}

/// The authenticated identity a client flow believes it has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub token: String,
}

/// In-process "current identity" for one client flow
///
/// Owned by the rendering layer. Login fills it before the cookie is written so the
/// rest of the flow already sees the user as authenticated; logout empties it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySlot {
    identity: Option<Identity>,
}

impl IdentitySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.username.as_str())
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.token.as_str())
    }

    pub(crate) fn set(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub(crate) fn clear(&mut self) -> Option<Identity> {
        self.identity.take()
    }
}

/// Instruction for the client-side cookie write channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieInstruction {
    Set {
        name: String,
        value: String,
        expires_at: DateTime<Utc>,
    },
    Delete {
        name: String,
    },
}

impl CookieInstruction {
    pub fn name(&self) -> &str {
        match self {
            Self::Set { name, .. } | Self::Delete { name } => name,
        }
    }

    /// Render as a `Set-Cookie` header value
    ///
    /// `now` is used to derive `Max-Age` from `expires_at`.
    pub fn to_set_cookie(&self, now: DateTime<Utc>, secure: bool) -> String {
        match self {
            Self::Set {
                name,
                value,
                expires_at,
            } => {
                let max_age = (*expires_at - now).num_seconds();
                format_set_cookie(name, value, *expires_at, max_age, secure)
            }
            Self::Delete { name } => {
                format_set_cookie(name, "", DateTime::<Utc>::UNIX_EPOCH, 0, secure)
            }
        }
    }
}

/// Where a cookie-sync flow stands within one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    IdentitySet,
    WriteIssued,
    Halted,
    FreshPass,
}

/// A cookie write that ends the current pass
///
/// Produced together with the identity change, in the same step. Rendering must stop
/// once a `Halt` exists: the transport delivers the instruction and the browser's
/// acknowledgement starts a fresh pass.
#[must_use = "a Halt must be delivered to the client; rendering must stop after it is issued"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    instruction: CookieInstruction,
    secure: bool,
}

impl Halt {
    pub(crate) fn new(instruction: CookieInstruction, secure: bool) -> Self {
        tracing::debug!(
            cookie = instruction.name(),
            phase = ?SyncPhase::WriteIssued,
            "Cookie write issued, halting pass"
        );
        Self {
            instruction,
            secure,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        SyncPhase::Halted
    }

    pub fn instruction(&self) -> &CookieInstruction {
        &self.instruction
    }

    /// Consume the halt into response headers carrying the cookie write
    pub fn into_headers(self) -> Result<HeaderMap, SessionError> {
        self.into_headers_at(Utc::now())
    }

    pub(crate) fn into_headers_at(self, now: DateTime<Utc>) -> Result<HeaderMap, SessionError> {
        let mut headers = HeaderMap::new();
        let cookie = self.instruction.to_set_cookie(now, self.secure);
        header_set_cookie(&mut headers, &cookie)?;
        Ok(headers)
    }
}
