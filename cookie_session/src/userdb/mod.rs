mod errors;
mod store;
mod types;
mod verifier;

pub use errors::UserError;
pub use store::{
    CredentialStore, InMemoryCredentialStore, SharedCredentialStore, SqliteCredentialStore,
    build_credential_store,
};
pub use types::{CredentialRecord, hash_password};
pub use verifier::CredentialVerifier;
