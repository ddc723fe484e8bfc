//! The two login paths behind one trait, so the session manager adopts the
//! outcome without caring which path produced it.

use async_trait::async_trait;
use tracing::debug;

use crate::clients::IdentityClient;
use crate::domain::{AuthenticationResult, Role, User};
use crate::identity_actor::AuthenticationError;

use super::error::SessionError;

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> Result<AuthenticationResult, SessionError>;
}

/// Real path: verify the identifier/secret pair against the identity store
/// and come back with a bearer token.
pub struct CredentialAuthenticator {
    identity: IdentityClient,
    identifier: String,
    secret: String,
}

impl CredentialAuthenticator {
    pub fn new(identity: IdentityClient, identifier: String, secret: String) -> Self {
        Self {
            identity,
            identifier,
            secret,
        }
    }
}

#[async_trait]
impl Authenticator for CredentialAuthenticator {
    async fn authenticate(&self) -> Result<AuthenticationResult, SessionError> {
        debug!("Authenticating against the identity store");
        let outcome = self
            .identity
            .login(self.identifier.clone(), self.secret.clone())
            .await
            .map_err(|e| match e {
                AuthenticationError::ActorCommunication(_) => SessionError::IdentityUnreachable,
                other => SessionError::Authentication(other),
            })?;
        Ok(AuthenticationResult {
            user: outcome.user,
            token: Some(outcome.token),
        })
    }
}

/// Demo path: adopt the canonical user for a role straight from the fixed
/// directory. No identity traffic, no token.
pub struct DemoAuthenticator {
    role: Role,
}

impl DemoAuthenticator {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

#[async_trait]
impl Authenticator for DemoAuthenticator {
    async fn authenticate(&self) -> Result<AuthenticationResult, SessionError> {
        debug!(role = %self.role, "Adopting demo user");
        Ok(AuthenticationResult {
            user: demo_user(self.role),
            token: None,
        })
    }
}

/// The canonical demo account for each role.
pub fn demo_user(role: Role) -> User {
    match role {
        Role::Consumer => User::new(
            "demo-consumer",
            Role::Consumer,
            "Dana Okafor",
            "dana@demo.foodbridge.example",
        ),
        Role::Restaurant => User::new(
            "demo-restaurant",
            Role::Restaurant,
            "Harbor Lane Bistro",
            "kitchen@harborlane.example",
        ),
        Role::Grocery => User::new(
            "demo-grocery",
            Role::Grocery,
            "Greenfield Grocers",
            "shift@greenfield.example",
        ),
        Role::Ngo => User::new(
            "demo-ngo",
            Role::Ngo,
            "City Harvest Collective",
            "ops@cityharvest.example",
        ),
        Role::Admin => User::new(
            "demo-admin",
            Role::Admin,
            "Platform Operations",
            "admin@foodbridge.example",
        ),
    }
}

/// One entry per role, for seeding the identity directory.
pub fn demo_users() -> Vec<User> {
    Role::ALL.iter().map(|role| demo_user(*role)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_role_has_a_distinct_demo_user() {
        let users = demo_users();
        assert_eq!(users.len(), Role::ALL.len());
        for (user, role) in users.iter().zip(Role::ALL) {
            assert_eq!(user.role, role);
        }
        let mut ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Role::ALL.len());
    }

    #[tokio::test]
    async fn demo_authentication_never_carries_a_token() {
        let result = DemoAuthenticator::new(Role::Grocery)
            .authenticate()
            .await
            .unwrap();
        assert_eq!(result.user.id, "demo-grocery");
        assert_eq!(result.token, None);
    }
}
