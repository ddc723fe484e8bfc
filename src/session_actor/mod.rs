//! The session manager: owns "who is signed in" for one client instance.
//!
//! All session mutations flow through this actor's mailbox, so a login or
//! restore always completes before the next request is looked at. Adoption
//! persists the durable snapshot first and commits memory second; a failed
//! write leaves the in-memory session untouched.

pub mod authenticator;
pub mod error;
pub mod messages;
pub mod store;

pub use authenticator::{demo_user, demo_users, Authenticator};
pub use error::SessionError;
pub use messages::SessionRequest;
pub use store::{FileSessionStore, SessionStore, StorageError};
#[cfg(test)]
pub use store::MemorySessionStore;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ServiceResponse;
use crate::clients::{IdentityClient, SessionClient};
use crate::domain::{AuthenticationResult, Role, Session, User};

use authenticator::{CredentialAuthenticator, DemoAuthenticator};

pub struct SessionService {
    receiver: mpsc::Receiver<SessionRequest>,
    identity: IdentityClient,
    store: Arc<dyn SessionStore>,
    session: Session,
}

impl SessionService {
    pub fn new(
        buffer_size: usize,
        identity: IdentityClient,
        store: Arc<dyn SessionStore>,
    ) -> (Self, SessionClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            identity,
            store,
            session: Session::default(),
        };
        let client = SessionClient::new(sender);
        (service, client)
    }

    #[instrument(name = "session_service", skip(self))]
    pub async fn run(mut self) {
        info!("SessionService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SessionRequest::Restore { respond_to } => {
                    self.handle_restore(respond_to).await;
                }
                SessionRequest::LoginWithCredentials {
                    identifier,
                    secret,
                    respond_to,
                } => {
                    self.handle_login_with_credentials(identifier, secret, respond_to)
                        .await;
                }
                SessionRequest::LoginAsDemo { role, respond_to } => {
                    self.handle_login_as_demo(role, respond_to).await;
                }
                SessionRequest::Logout { respond_to } => {
                    self.handle_logout(respond_to).await;
                }
                SessionRequest::CurrentUser { respond_to } => {
                    self.handle_current_user(respond_to);
                }
                SessionRequest::Shutdown => {
                    info!("SessionService shutting down");
                    break;
                }
            }
        }

        info!("SessionService stopped");
    }

    /// Restore order: user slot, then token exchange, then signed out.
    /// A saved user is adopted without any identity traffic. Storage trouble
    /// degrades to signed out; only the cause is logged.
    #[instrument(skip(self, respond_to))]
    async fn handle_restore(&mut self, respond_to: ServiceResponse<Option<User>, SessionError>) {
        debug!("Processing restore request");

        if self.session.authenticated() {
            debug!("Session already live, nothing to restore");
            let _ = respond_to.send(Ok(self.session.user.clone()));
            return;
        }

        match self.store.load_user().await {
            Ok(Some(user)) => {
                self.session.user = Some(user.clone());
                self.session.token = match self.store.load_token().await {
                    Ok(token) => token,
                    Err(e) => {
                        warn!(error = %e, "Token slot unreadable");
                        None
                    }
                };
                info!(user_id = %user.id, role = %user.role, "Session restored from snapshot");
                let _ = respond_to.send(Ok(Some(user)));
                return;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "User slot unreadable, trying token exchange");
            }
        }

        let token = match self.store.load_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No saved session");
                let _ = respond_to.send(Ok(None));
                return;
            }
            Err(e) => {
                warn!(error = %e, "Token slot unreadable, treating session as signed out");
                let _ = respond_to.send(Ok(None));
                return;
            }
        };

        match self.identity.get_current_user(token.clone()).await {
            Ok(user) => {
                // Persist the resolved user so the next restore skips the
                // exchange entirely.
                if let Err(e) = self.store.save_user(&user).await {
                    warn!(error = %e, "Could not persist restored user");
                }
                self.session.user = Some(user.clone());
                self.session.token = Some(token);
                info!(user_id = %user.id, "Session restored via token exchange");
                let _ = respond_to.send(Ok(Some(user)));
            }
            Err(e) => {
                info!(error = %e, "Saved token rejected, clearing it");
                if let Err(e) = self.store.clear_token().await {
                    warn!(error = %e, "Could not clear rejected token");
                }
                let _ = respond_to.send(Ok(None));
            }
        }
    }

    #[instrument(fields(identifier = %identifier), skip(self, identifier, secret, respond_to))]
    async fn handle_login_with_credentials(
        &mut self,
        identifier: String,
        secret: String,
        respond_to: ServiceResponse<User, SessionError>,
    ) {
        debug!("Processing credential login request");

        let authenticator = CredentialAuthenticator::new(self.identity.clone(), identifier, secret);
        let result = self.login_via(&authenticator).await;

        match &result {
            Ok(user) => info!(user_id = %user.id, role = %user.role, "Credential login adopted"),
            Err(e) => warn!(error = %e, "Credential login failed"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(role = %role), skip(self, respond_to))]
    async fn handle_login_as_demo(
        &mut self,
        role: Role,
        respond_to: ServiceResponse<User, SessionError>,
    ) {
        debug!("Processing demo login request");

        let authenticator = DemoAuthenticator::new(role);
        let result = self.login_via(&authenticator).await;

        match &result {
            Ok(user) => info!(user_id = %user.id, "Demo login adopted"),
            Err(e) => warn!(error = %e, "Demo login failed"),
        }

        let _ = respond_to.send(result);
    }

    /// Both login paths converge here: authenticate, then adopt the outcome.
    async fn login_via(&mut self, authenticator: &dyn Authenticator) -> Result<User, SessionError> {
        let result = authenticator.authenticate().await?;
        self.adopt(result).await
    }

    /// Persist first, commit memory after. The token slot is cleared for
    /// tokenless (demo) results so a later restore cannot find a stale token.
    async fn adopt(&mut self, result: AuthenticationResult) -> Result<User, SessionError> {
        let AuthenticationResult { user, token } = result;

        if let Err(e) = self.persist(&user, token.as_deref()).await {
            // The snapshot may be half-written; drop it so restore never
            // sees a token without its user.
            if let Err(cleanup) = self.store.clear().await {
                warn!(error = %cleanup, "Could not roll back partial snapshot");
            }
            return Err(e.into());
        }

        self.session.user = Some(user.clone());
        self.session.token = token;
        Ok(user)
    }

    async fn persist(&self, user: &User, token: Option<&str>) -> Result<(), StorageError> {
        self.store.save_user(user).await?;
        match token {
            Some(token) => self.store.save_token(token).await,
            None => self.store.clear_token().await,
        }
    }

    /// Sign-out always clears the in-memory session; token revocation at the
    /// identity store is best-effort.
    #[instrument(skip(self, respond_to))]
    async fn handle_logout(&mut self, respond_to: ServiceResponse<(), SessionError>) {
        debug!("Processing logout request");

        if let Some(token) = self.session.token.take() {
            if let Err(e) = self.identity.logout(token).await {
                warn!(error = %e, "Token revocation failed, signing out anyway");
            }
        }
        self.session.clear();

        let result = self.store.clear().await.map_err(SessionError::from);
        if result.is_ok() {
            info!("Signed out");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_current_user(&self, respond_to: ServiceResponse<Option<User>, SessionError>) {
        debug!("Processing current_user request");
        let _ = respond_to.send(Ok(self.session.user.clone()));
    }
}
