use thiserror::Error;

use crate::identity_actor::AuthenticationError;

use super::store::StorageError;

/// Errors surfaced by the session manager. None of these are fatal; the
/// session simply stays (or becomes) unauthenticated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Identity service unreachable")]
    IdentityUnreachable,
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
