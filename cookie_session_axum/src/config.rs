//! UI routes used by the axum layer

use std::sync::LazyLock;

/// Where a signed-in user lands when no safe `next` target is given
/// Default: "/"
pub static COOKIE_SESSION_REDIRECT_USER: LazyLock<String> = LazyLock::new(|| {
    std::env::var("COOKIE_SESSION_REDIRECT_USER").unwrap_or_else(|_| "/".to_string())
});

/// URL of the login page; anonymous GET requests are redirected here
/// Default: "/login"
pub static COOKIE_SESSION_LOGIN_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("COOKIE_SESSION_LOGIN_URL").unwrap_or_else(|_| "/login".to_string())
});
