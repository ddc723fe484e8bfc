use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// In-memory view of who is signed in right now. Demo sessions have a user
/// but no token; credentialed sessions carry both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.token = None;
    }
}

/// What an authenticator hands back on success. Demo authentication yields no
/// token, so restores of a demo session never touch the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticationResult {
    pub user: User,
    pub token: Option<String>,
}
