mod config;
mod memory;
mod sqlite;
mod types;

pub use config::build_credential_store;
pub use types::{
    CredentialStore, InMemoryCredentialStore, SharedCredentialStore, SqliteCredentialStore,
};
