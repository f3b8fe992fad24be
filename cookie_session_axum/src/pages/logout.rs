use axum::{extract::State, http::StatusCode, response::Response};
use http::HeaderMap;

use cookie_session::{AuthCoordinator, IdentitySlot};

use crate::config::COOKIE_SESSION_LOGIN_URL;
use crate::error::IntoResponseError;
use crate::halt::halt_and_redirect;

/// Destroy the session named by the request cookie and delete the cookie
///
/// Always ends on the login page, whether or not a session was found.
pub(super) async fn logout(
    State(coordinator): State<AuthCoordinator>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    let mut slot = IdentitySlot::new();
    coordinator
        .restore(&mut slot, &headers)
        .await
        .into_response_error()?;

    let halt = coordinator.logout(&mut slot).await.into_response_error()?;
    halt_and_redirect(halt, COOKIE_SESSION_LOGIN_URL.as_str())
}
