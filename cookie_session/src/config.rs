//! Central configuration for the cookie_session crate
//!
//! Values are read from the environment once, at service start-up, and then passed
//! explicitly into the components that need them.

use chrono::Duration;

/// Default session lifetime: 24 hours
pub const DEFAULT_SESSION_DURATION_SECS: i64 = 24 * 60 * 60;

/// Longest accepted session lifetime: 400 days, the cap browsers put on cookie lifetimes
pub const MAX_SESSION_DURATION_SECS: i64 = 400 * 24 * 60 * 60;

/// Default name of the session cookie
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "auth_session";

const DEFAULT_SESSION_STORE_URL: &str = "redis://localhost:6379";
const DEFAULT_CREDENTIAL_STORE_URL: &str = "sqlite::memory:";

/// Session policy shared by the session manager and the cookie protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// How long a session stays valid after creation
    pub session_duration: Duration,
    /// Name of the cookie carrying the session token
    pub cookie_name: String,
    /// Whether to mark the cookie `Secure`
    pub cookie_secure: bool,
    /// Interval for the optional expired-session sweep; `None` keeps expiry purely lazy
    pub sweep_interval: Option<std::time::Duration>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_duration: Duration::seconds(DEFAULT_SESSION_DURATION_SECS),
            cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            cookie_secure: false,
            sweep_interval: None,
        }
    }
}

impl AuthConfig {
    /// Build the configuration from `SESSION_*` environment variables
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_duration = lookup("SESSION_DURATION_SECS")
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|secs| (0..=MAX_SESSION_DURATION_SECS).contains(secs))
            .and_then(Duration::try_seconds)
            .unwrap_or_else(|| Duration::seconds(DEFAULT_SESSION_DURATION_SECS));

        let cookie_name = lookup("SESSION_COOKIE_NAME")
            .filter(|s| is_cookie_name(s))
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string());

        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .map(|val| val.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let sweep_interval = lookup("SESSION_SWEEP_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(std::time::Duration::from_secs);

        Self {
            session_duration,
            cookie_name,
            cookie_secure,
            sweep_interval,
        }
    }

    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }
}

/// Whether `name` is an RFC 6265 cookie-name token
fn is_cookie_name(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={}";
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

/// Which backend holds sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreKind {
    Memory,
    Redis { url: String },
}

/// Which backend holds credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStoreKind {
    Memory,
    Sqlite { url: String },
}

/// Backend selection for the two stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub session_store: SessionStoreKind,
    pub credential_store: CredentialStoreKind,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            session_store: SessionStoreKind::Memory,
            credential_store: CredentialStoreKind::Memory,
        }
    }
}

impl StoreConfig {
    /// Build the store selection from `SESSION_STORE_*` and `CREDENTIAL_STORE_*` variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_store = match lookup("SESSION_STORE_TYPE").as_deref() {
            None | Some("memory") => SessionStoreKind::Memory,
            Some("redis") => SessionStoreKind::Redis {
                url: lookup("SESSION_STORE_URL")
                    .unwrap_or_else(|| DEFAULT_SESSION_STORE_URL.to_string()),
            },
            Some(other) => {
                return Err(ConfigError::UnsupportedStore {
                    variable: "SESSION_STORE_TYPE",
                    value: other.to_string(),
                });
            }
        };

        let credential_store = match lookup("CREDENTIAL_STORE_TYPE").as_deref() {
            None | Some("memory") => CredentialStoreKind::Memory,
            Some("sqlite") => CredentialStoreKind::Sqlite {
                url: lookup("CREDENTIAL_STORE_URL")
                    .unwrap_or_else(|| DEFAULT_CREDENTIAL_STORE_URL.to_string()),
            },
            Some(other) => {
                return Err(ConfigError::UnsupportedStore {
                    variable: "CREDENTIAL_STORE_TYPE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            session_store,
            credential_store,
        })
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported value for {variable}: {value}")]
    UnsupportedStore {
        variable: &'static str,
        value: String,
    },
}
