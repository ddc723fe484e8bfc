use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{Role, User, UserProfile};
use crate::identity_actor::{AuthenticationError, IdentityRequest, LoginOutcome};

/// Client for the identity actor.
///
/// Methods carrying secrets or tokens keep them out of the trace fields.
#[derive(Clone)]
pub struct IdentityClient {
    sender: mpsc::Sender<IdentityRequest>,
}

impl IdentityClient {
    pub fn new(sender: mpsc::Sender<IdentityRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self, identifier, secret), fields(identifier = %identifier))]
    pub async fn login(
        &self,
        identifier: String,
        secret: String,
    ) -> Result<LoginOutcome, AuthenticationError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(IdentityRequest::Login {
                identifier,
                secret,
                respond_to,
            })
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor dropped".to_string()))?
    }

    #[instrument(skip(self, token))]
    pub async fn get_current_user(&self, token: String) -> Result<User, AuthenticationError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(IdentityRequest::GetCurrentUser { token, respond_to })
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor dropped".to_string()))?
    }

    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: String) -> Result<(), AuthenticationError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(IdentityRequest::Logout { token, respond_to })
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor dropped".to_string()))?
    }

    #[instrument(skip(self, identifier, secret, profile), fields(identifier = %identifier, role = %role))]
    pub async fn register(
        &self,
        identifier: String,
        secret: String,
        role: Role,
        profile: UserProfile,
    ) -> Result<User, AuthenticationError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(IdentityRequest::Register {
                identifier,
                secret,
                role,
                profile,
                respond_to,
            })
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor dropped".to_string()))?
    }

    #[cfg(test)]
    pub async fn token_count(&self) -> Result<usize, AuthenticationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(IdentityRequest::TokenCount { respond_to })
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| AuthenticationError::ActorCommunication("Actor dropped".to_string()))?
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        debug!("Sending shutdown request");
        let _ = self.sender.send(IdentityRequest::Shutdown).await;
    }
}

client_method!(IdentityClient => fn get_user(id: String) -> Option<User> as IdentityRequest::GetUser, Error = AuthenticationError);
