mod config;
mod memory;
mod redis;
mod types;

pub use config::build_session_store;
pub use types::{InMemorySessionStore, RedisSessionStore, SessionStore, SharedSessionStore, shared};
