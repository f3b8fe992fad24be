use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use ring::rand::SecureRandom;
use thiserror::Error;

/// Number of token characters that may appear in logs
pub(crate) const TOKEN_LOG_PREFIX_LEN: usize = 8;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),
}

pub(crate) fn base64url_encode(input: Vec<u8>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Generate `len` random bytes from the system CSPRNG, base64url encoded
pub fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random string".to_string()))?;
    Ok(base64url_encode(bytes))
}

/// Truncate a token to a prefix that is safe to log
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(TOKEN_LOG_PREFIX_LEN) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

/// Format a `Set-Cookie` value
///
/// `max_age` is clamped to zero; a zero max-age tells the browser to drop the cookie.
pub(crate) fn format_set_cookie(
    name: &str,
    value: &str,
    expires_at: DateTime<Utc>,
    max_age: i64,
    secure: bool,
) -> String {
    let max_age = max_age.max(0);
    let expires = expires_at.format("%a, %d %b %Y %H:%M:%S GMT");
    let mut cookie = format!(
        "{name}={value}; SameSite=Lax; HttpOnly; Path=/; Max-Age={max_age}; Expires={expires}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub(crate) fn header_set_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), UtilError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|_| UtilError::Cookie("Failed to parse cookie".to_string()))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}
