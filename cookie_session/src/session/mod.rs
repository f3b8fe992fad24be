mod errors;
mod main;
mod types;

pub use errors::SessionError;
pub use main::{CookieSync, MAX_TOKEN_ATTEMPTS, SessionManager};
pub use types::{CookieInstruction, Halt, Identity, IdentitySlot, Session, SyncPhase};
