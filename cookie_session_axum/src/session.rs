use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use http::{HeaderMap, Method, StatusCode, Uri, request::Parts};

use cookie_session::{AuthCoordinator, Identity, IdentitySlot, token_prefix};

use super::config::COOKIE_SESSION_LOGIN_URL;
use super::error::IntoResponseError;

pub struct AuthRedirect {
    method: Method,
    next: Option<String>,
}

impl AuthRedirect {
    fn new(method: Method, uri: &Uri) -> Self {
        let next = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .filter(|next| next != "/");
        Self { method, next }
    }

    fn login_location(&self) -> String {
        match &self.next {
            Some(next) => format!(
                "{}?next={}",
                COOKIE_SESSION_LOGIN_URL.as_str(),
                urlencoding::encode(next)
            ),
            None => COOKIE_SESSION_LOGIN_URL.to_string(),
        }
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        if self.method == Method::GET {
            let location = self.login_location();
            tracing::debug!("Redirecting to {}", location);
            Redirect::to(&location).into_response()
        } else {
            tracing::debug!("Unauthorized");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

/// Why a request could not be given an [`AuthUser`]
pub enum AuthRejection {
    /// No cookie, or a cookie naming no live session
    Unauthenticated(AuthRedirect),
    /// The session lookup itself failed
    Failed(StatusCode, String),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated(redirect) => redirect.into_response(),
            Self::Failed(status, message) => {
                tracing::error!("Session lookup failed: {}", message);
                (status, message).into_response()
            }
        }
    }
}

/// Authenticated user, available as an Axum extractor
///
/// The identity is re-derived from the session cookie on every request. Anonymous
/// `GET` requests are redirected to the login page with a `next` parameter; other
/// methods get `401`. If the session store is down the request fails with `503`.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use cookie_session::AuthCoordinator;
/// use cookie_session_axum::AuthUser;
///
/// async fn protected_handler(user: AuthUser) -> String {
///     format!("Hello, {}!", user.username)
/// }
///
/// fn app(coordinator: AuthCoordinator) -> Router {
///     Router::new()
///         .route("/protected", get(protected_handler))
///         .with_state(coordinator)
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub token: String,
}

impl AuthUser {
    /// Loggable leading part of the session token
    pub fn token_prefix(&self) -> &str {
        token_prefix(&self.token)
    }
}

impl From<Identity> for AuthUser {
    fn from(identity: Identity) -> Self {
        Self {
            username: identity.username,
            token: identity.token,
        }
    }
}

/// Run the auth gate for one request
pub(crate) async fn resolve_user(
    coordinator: &AuthCoordinator,
    headers: &HeaderMap,
) -> Result<Option<AuthUser>, AuthRejection> {
    let mut slot = IdentitySlot::new();
    coordinator
        .restore(&mut slot, headers)
        .await
        .into_response_error()
        .map_err(|(status, message)| AuthRejection::Failed(status, message))?;
    Ok(slot.identity().cloned().map(AuthUser::from))
}

pub(crate) async fn authenticate(
    coordinator: &AuthCoordinator,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<AuthUser, AuthRejection> {
    resolve_user(coordinator, headers).await?.ok_or_else(|| {
        AuthRejection::Unauthenticated(AuthRedirect::new(method.clone(), uri))
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthCoordinator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by the require_auth middleware
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let coordinator = AuthCoordinator::from_ref(state);
        authenticate(&coordinator, &parts.method, &parts.uri, &parts.headers).await
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    AuthCoordinator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(user) => Ok(Some(user)),
            Err(AuthRejection::Unauthenticated(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
