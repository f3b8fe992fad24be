mod auth;
mod errors;
mod types;

pub use auth::AuthCoordinator;
pub use errors::CoordinationError;
pub use types::{LoginOutcome, LoginRejection};
