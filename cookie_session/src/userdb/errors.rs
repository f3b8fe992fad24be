use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum UserError {
    /// The credential store could not be reached or failed a query
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        UserError::Storage(err.to_string())
    }
}
