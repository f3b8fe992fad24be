use crate::session::Halt;

/// Why a login form submission was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    MissingFields,
    /// Unknown user and wrong password are deliberately the same case
    InvalidCredentials,
}

impl LoginRejection {
    /// Message shown on the login form
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFields => "Please enter both username and password.",
            Self::InvalidCredentials => "Invalid username or password.",
        }
    }
}

/// Result of a login attempt
#[must_use]
#[derive(Debug)]
pub enum LoginOutcome {
    /// Render the login form again with the rejection message
    Rejected(LoginRejection),
    /// Session created; deliver the cookie write and end the pass
    Halt(Halt),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Halt(_))
    }
}
