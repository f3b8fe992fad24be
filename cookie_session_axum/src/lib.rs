//! cookie_session_axum - Axum integration for cookie_session
//!
//! Provides the [`AuthUser`] extractor, the [`require_auth`] middleware, the login and
//! logout pages, and [`halt_and_redirect`] for delivering a cookie write.

mod config;
mod error;
mod halt;
mod middleware;
mod pages;
mod router;
mod session;

pub use config::{COOKIE_SESSION_LOGIN_URL, COOKIE_SESSION_REDIRECT_USER};
pub use error::IntoResponseError;
pub use halt::halt_and_redirect;
pub use middleware::require_auth;
pub use router::{cookie_session_router, cookie_session_router_no_trace};
pub use session::{AuthRedirect, AuthRejection, AuthUser};

pub use cookie_session::AuthCoordinator;
