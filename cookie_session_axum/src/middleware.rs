use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use cookie_session::AuthCoordinator;

use super::session::authenticate;

/// Auth gate as middleware
///
/// Attach with `axum::middleware::from_fn_with_state`. On success the resolved
/// [`AuthUser`](crate::AuthUser) is stored in the request extensions, where the
/// extractor picks it up without a second lookup.
pub async fn require_auth(
    State(coordinator): State<AuthCoordinator>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&coordinator, req.method(), req.uri(), req.headers()).await {
        Ok(user) => {
            tracing::debug!(
                "Authenticated '{}' (token prefix: {})",
                user.username,
                user.token_prefix()
            );
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(rejection) => rejection.into_response(),
    }
}
