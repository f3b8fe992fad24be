use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// The session store could not be reached or returned bad data.
    /// Never collapsed into "unauthenticated".
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to allocate a unique session token after {0} attempts")]
    TokenCollision(usize),

    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Session duration puts the expiry out of range")]
    ExpiryOutOfRange,

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
