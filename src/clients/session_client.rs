use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{Role, User};
use crate::session_actor::{SessionError, SessionRequest};

/// Client for the session actor.
#[derive(Clone)]
pub struct SessionClient {
    sender: mpsc::Sender<SessionRequest>,
}

impl SessionClient {
    pub fn new(sender: mpsc::Sender<SessionRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self, identifier, secret), fields(identifier = %identifier))]
    pub async fn login_with_credentials(
        &self,
        identifier: String,
        secret: String,
    ) -> Result<User, SessionError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SessionRequest::LoginWithCredentials {
                identifier,
                secret,
                respond_to,
            })
            .await
            .map_err(|_| SessionError::ActorCommunication("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| SessionError::ActorCommunication("Actor dropped".to_string()))?
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        debug!("Sending shutdown request");
        let _ = self.sender.send(SessionRequest::Shutdown).await;
    }
}

client_method!(SessionClient => fn restore() -> Option<User> as SessionRequest::Restore, Error = SessionError);
client_method!(SessionClient => fn login_as_demo(role: Role) -> User as SessionRequest::LoginAsDemo, Error = SessionError);
client_method!(SessionClient => fn logout() -> () as SessionRequest::Logout, Error = SessionError);
client_method!(SessionClient => fn current_user() -> Option<User> as SessionRequest::CurrentUser, Error = SessionError);
