use axum::response::{IntoResponse, Redirect, Response};
use http::{StatusCode, uri::PathAndQuery};

use cookie_session::Halt;

use super::error::IntoResponseError;

/// Deliver a cookie write and end the pass
///
/// The response is a `303 See Other` carrying the `Set-Cookie` header; the browser
/// following `location` is the fresh pass that reads the new cookie.
pub fn halt_and_redirect(halt: Halt, location: &str) -> Result<Response, (StatusCode, String)> {
    let headers = halt.into_headers().into_response_error()?;
    tracing::debug!("Cookie write delivered, redirecting to {}", location);
    Ok((headers, Redirect::to(location)).into_response())
}

/// Keep post-login redirects on this site
///
/// Only absolute paths that are valid in a `Location` header are accepted; anything
/// else falls back to `default`. Control characters and whitespace are rejected since
/// browsers strip them while parsing, which can turn `/\t/host` into `//host`.
pub(crate) fn safe_next<'a>(next: Option<&'a str>, default: &'a str) -> &'a str {
    match next {
        Some(path) if is_local_path(path) => path,
        _ => default,
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(|c| c.is_control() || c.is_ascii_whitespace())
        && path.parse::<PathAndQuery>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/about"), "/"), "/about");
        assert_eq!(safe_next(Some("/about?x=1"), "/"), "/about?x=1");
        assert_eq!(safe_next(None, "/"), "/");
        assert_eq!(safe_next(Some(""), "/"), "/");
        assert_eq!(safe_next(Some("https://evil.example"), "/"), "/");
        assert_eq!(safe_next(Some("//evil.example"), "/"), "/");
        assert_eq!(safe_next(Some("/\\evil.example"), "/"), "/");
    }

    #[test]
    fn test_safe_next_rejects_control_characters() {
        assert_eq!(safe_next(Some("/\t/evil.example"), "/"), "/");
        assert_eq!(safe_next(Some("/\r\n/evil.example"), "/"), "/");
        assert_eq!(safe_next(Some("/about\n"), "/"), "/");
        assert_eq!(safe_next(Some("/ /evil.example"), "/"), "/");
        assert_eq!(safe_next(Some("/about\u{7f}"), "/"), "/");
    }
}
