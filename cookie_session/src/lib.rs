//! cookie_session - server-side sessions kept in step with a client-held cookie
//!
//! The crate verifies credentials, mints and validates sessions with lazy expiry, and
//! drives the cookie protocol: reads come from the request's `Cookie` header, writes are
//! returned as a [`Halt`] that the transport turns into a `Set-Cookie` response.

mod config;
mod coordination;
mod session;
mod storage;
mod userdb;
mod utils;

pub use config::{
    AuthConfig, ConfigError, CredentialStoreKind, DEFAULT_SESSION_COOKIE_NAME,
    DEFAULT_SESSION_DURATION_SECS, MAX_SESSION_DURATION_SECS, SessionStoreKind, StoreConfig,
};

pub use coordination::{AuthCoordinator, CoordinationError, LoginOutcome, LoginRejection};

pub use session::{
    CookieInstruction, CookieSync, Halt, Identity, IdentitySlot, MAX_TOKEN_ATTEMPTS, Session,
    SessionError, SessionManager, SyncPhase,
};

pub use storage::{
    InMemorySessionStore, RedisSessionStore, SessionStore, SharedSessionStore, StorageError,
    build_session_store, shared,
};

pub use userdb::{
    CredentialRecord, CredentialStore, CredentialVerifier, InMemoryCredentialStore,
    SharedCredentialStore, SqliteCredentialStore, UserError, build_credential_store,
    hash_password,
};

pub use utils::{UtilError, token_prefix};
