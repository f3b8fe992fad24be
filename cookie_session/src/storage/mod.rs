mod errors;
mod session_store;

pub use errors::StorageError;
pub use session_store::{
    InMemorySessionStore, RedisSessionStore, SessionStore, SharedSessionStore,
    build_session_store, shared,
};
