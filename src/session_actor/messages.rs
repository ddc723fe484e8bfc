use crate::actor_framework::ServiceResponse;
use crate::domain::{Role, User};

use super::error::SessionError;

#[derive(Debug)]
pub enum SessionRequest {
    /// Rebuild the session from the durable snapshot (or a saved token).
    Restore {
        respond_to: ServiceResponse<Option<User>, SessionError>,
    },
    LoginWithCredentials {
        identifier: String,
        secret: String,
        respond_to: ServiceResponse<User, SessionError>,
    },
    LoginAsDemo {
        role: Role,
        respond_to: ServiceResponse<User, SessionError>,
    },
    Logout {
        respond_to: ServiceResponse<(), SessionError>,
    },
    CurrentUser {
        respond_to: ServiceResponse<Option<User>, SessionError>,
    },
    Shutdown,
}
