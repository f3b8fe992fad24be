mod cookie;
pub(crate) mod session;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cookie::CookieSync;
pub use session::{MAX_TOKEN_ATTEMPTS, SessionManager};
