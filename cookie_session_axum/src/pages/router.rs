use axum::{
    Router,
    routing::{get, post},
};

use cookie_session::AuthCoordinator;

/// Login form and logout endpoints
pub(crate) fn router() -> Router<AuthCoordinator> {
    Router::new()
        .route("/login", get(super::login::login).post(super::login::login_submit))
        .route("/logout", post(super::logout::logout))
}
