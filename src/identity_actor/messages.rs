use crate::actor_framework::ServiceResponse;
use crate::domain::{Role, User, UserProfile};

use super::error::AuthenticationError;

/// What a successful credential login hands back: the resolved user plus the
/// bearer token that can later be exchanged for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

#[derive(Debug)]
pub enum IdentityRequest {
    Login {
        identifier: String,
        secret: String,
        respond_to: ServiceResponse<LoginOutcome, AuthenticationError>,
    },
    GetCurrentUser {
        token: String,
        respond_to: ServiceResponse<User, AuthenticationError>,
    },
    Logout {
        token: String,
        respond_to: ServiceResponse<(), AuthenticationError>,
    },
    GetUser {
        id: String,
        respond_to: ServiceResponse<Option<User>, AuthenticationError>,
    },
    Register {
        identifier: String,
        secret: String,
        role: Role,
        profile: UserProfile,
        respond_to: ServiceResponse<User, AuthenticationError>,
    },
    Shutdown,
    #[cfg(test)]
    TokenCount {
        respond_to: ServiceResponse<usize, AuthenticationError>,
    },
}
