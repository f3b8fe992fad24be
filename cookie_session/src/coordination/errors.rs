use thiserror::Error;

use crate::session::SessionError;
use crate::userdb::UserError;

/// Errors that end a login or logout flow
///
/// Bad credentials are not errors; they come back as a rejected outcome.
#[derive(Error, Debug, Clone)]
pub enum CoordinationError {
    #[error("Session error: {0}")]
    SessionError(SessionError),

    #[error("User error: {0}")]
    UserError(UserError),
}

impl CoordinationError {
    /// Whether a backing store was unreachable, as opposed to a local failure
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::SessionError(SessionError::Storage(_)) | Self::UserError(UserError::Storage(_))
        )
    }
}

// Conversions log once, where the error crosses into coordination
impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        let error = Self::SessionError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        let error = Self::UserError(err);
        tracing::error!("{}", error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_store_unavailable_classification() {
        let session_down: CoordinationError =
            SessionError::Storage(StorageError::Storage("down".to_string())).into();
        let users_down: CoordinationError = UserError::Storage("down".to_string()).into();
        let collision: CoordinationError = SessionError::TokenCollision(3).into();

        assert!(session_down.is_store_unavailable());
        assert!(users_down.is_store_unavailable());
        assert!(!collision.is_store_unavailable());
    }
}
