use http::StatusCode;

use cookie_session::{CoordinationError, SessionError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Unreachable stores become 503 so they are never mistaken for a missing login
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = if e.is_store_unavailable() {
                StatusCode::SERVICE_UNAVAILABLE
            } else if matches!(
                e,
                CoordinationError::SessionError(SessionError::EmptyUsername)
            ) {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string())
        })
    }
}

impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                SessionError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
                SessionError::EmptyUsername => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}
