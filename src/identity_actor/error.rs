use thiserror::Error;

/// Errors the identity store reports to callers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthenticationError {
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl AuthenticationError {
    /// Uniform rejection: the store never reveals whether the identifier
    /// exists or the secret was wrong.
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials("Invalid credentials".to_string())
    }
}
