//! Router for the login and logout pages

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use cookie_session::AuthCoordinator;

/// Create the router for the login form (`GET`/`POST /login`) and `POST /logout`
///
/// Merge it at the root, or nest it and point `COOKIE_SESSION_LOGIN_URL` at the new path.
pub fn cookie_session_router(coordinator: AuthCoordinator) -> Router {
    cookie_session_router_no_trace(coordinator).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`cookie_session_router`] without the HTTP tracing middleware
pub fn cookie_session_router_no_trace(coordinator: AuthCoordinator) -> Router {
    super::pages::router().with_state(coordinator)
}
