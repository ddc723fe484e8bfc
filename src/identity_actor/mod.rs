//! The identity store: accounts, credential verification, and bearer tokens.
//!
//! Stands in for the remote identity provider. Credentials are kept as salted
//! SHA-256 digests; a successful login mints a `uuid` bearer token that can
//! later be exchanged for the user it belongs to.

pub mod error;
pub mod messages;

pub use error::AuthenticationError;
pub use messages::{IdentityRequest, LoginOutcome};

use std::collections::HashMap;

use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::actor_framework::ServiceResponse;
use crate::clients::IdentityClient;
use crate::domain::{Role, User, UserProfile};

/// Salted digest for one account. The plaintext secret is never stored.
struct StoredCredential {
    user_id: String,
    salt: String,
    digest: String,
}

fn new_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(bytes)
}

fn salted_digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct IdentityService {
    receiver: mpsc::Receiver<IdentityRequest>,
    users: HashMap<String, User>,
    credentials: HashMap<String, StoredCredential>,
    /// Bearer token → user id.
    tokens: HashMap<String, String>,
    next_id: u64,
}

impl IdentityService {
    pub fn new(buffer_size: usize) -> (Self, IdentityClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            users: HashMap::new(),
            credentials: HashMap::new(),
            tokens: HashMap::new(),
            next_id: 1,
        };
        let client = IdentityClient::new(sender);
        (service, client)
    }

    /// Adds a directory entry without credentials. The demo users land here
    /// so seller ids referenced by sample listings resolve.
    pub fn seed_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    /// Registers a credentialed account at startup. Ids come from the same
    /// counter as `Register`, so later signups never collide.
    #[allow(dead_code)]
    pub fn seed_account(
        &mut self,
        identifier: &str,
        secret: &str,
        role: Role,
        display_name: &str,
    ) -> String {
        let id = format!("user_{}", self.next_id);
        self.next_id += 1;
        let user = User::new(id.clone(), role, display_name, identifier);
        self.users.insert(id.clone(), user);
        self.insert_credential(identifier.to_string(), secret, id.clone());
        id
    }

    fn insert_credential(&mut self, identifier: String, secret: &str, user_id: String) {
        let salt = new_salt();
        let digest = salted_digest(&salt, secret);
        self.credentials.insert(
            identifier,
            StoredCredential {
                user_id,
                salt,
                digest,
            },
        );
    }

    #[instrument(name = "identity_service", skip(self))]
    pub async fn run(mut self) {
        info!("IdentityService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                IdentityRequest::Login {
                    identifier,
                    secret,
                    respond_to,
                } => {
                    self.handle_login(identifier, secret, respond_to);
                }
                IdentityRequest::GetCurrentUser { token, respond_to } => {
                    self.handle_get_current_user(token, respond_to);
                }
                IdentityRequest::Logout { token, respond_to } => {
                    self.handle_logout(token, respond_to);
                }
                IdentityRequest::GetUser { id, respond_to } => {
                    self.handle_get_user(id, respond_to);
                }
                IdentityRequest::Register {
                    identifier,
                    secret,
                    role,
                    profile,
                    respond_to,
                } => {
                    self.handle_register(identifier, secret, role, profile, respond_to);
                }
                IdentityRequest::Shutdown => {
                    info!("IdentityService shutting down");
                    break;
                }
                #[cfg(test)]
                IdentityRequest::TokenCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.tokens.len()));
                }
            }
        }

        info!("IdentityService stopped");
    }

    #[instrument(fields(identifier = %identifier), skip(self, identifier, secret, respond_to))]
    fn handle_login(
        &mut self,
        identifier: String,
        secret: String,
        respond_to: ServiceResponse<LoginOutcome, AuthenticationError>,
    ) {
        debug!("Processing login request");

        let verified_user_id = self
            .credentials
            .get(&identifier)
            .filter(|stored| salted_digest(&stored.salt, &secret) == stored.digest)
            .map(|stored| stored.user_id.clone());

        let result = match verified_user_id.and_then(|id| self.users.get(&id).cloned()) {
            Some(user) => {
                let token = Uuid::new_v4().to_string();
                self.tokens.insert(token.clone(), user.id.clone());
                info!(user_id = %user.id, role = %user.role, "Login succeeded");
                Ok(LoginOutcome { user, token })
            }
            None => {
                debug!("Login rejected");
                Err(AuthenticationError::invalid_credentials())
            }
        };

        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, token, respond_to))]
    fn handle_get_current_user(
        &self,
        token: String,
        respond_to: ServiceResponse<User, AuthenticationError>,
    ) {
        debug!("Processing get_current_user request");

        let result = self
            .tokens
            .get(&token)
            .and_then(|user_id| self.users.get(user_id))
            .cloned()
            .ok_or(AuthenticationError::InvalidToken);

        match &result {
            Ok(user) => debug!(user_id = %user.id, "Token resolved"),
            Err(_) => debug!("Token not recognized"),
        }

        let _ = respond_to.send(result);
    }

    /// Revoking an unknown token is a no-op, so logout is always safe to
    /// retry.
    #[instrument(skip(self, token, respond_to))]
    fn handle_logout(&mut self, token: String, respond_to: ServiceResponse<(), AuthenticationError>) {
        debug!("Processing logout request");

        match self.tokens.remove(&token) {
            Some(user_id) => info!(user_id = %user_id, "Token revoked"),
            None => debug!("Token already absent"),
        }

        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(user_id = %id), skip(self, id, respond_to))]
    fn handle_get_user(
        &self,
        id: String,
        respond_to: ServiceResponse<Option<User>, AuthenticationError>,
    ) {
        debug!("Processing get_user request");

        let user = self.users.get(&id).cloned();

        match &user {
            Some(user) => debug!(display_name = %user.profile.display_name, "User found"),
            None => debug!("User not found"),
        }

        let _ = respond_to.send(Ok(user));
    }

    #[instrument(fields(identifier = %identifier, role = %role), skip_all)]
    fn handle_register(
        &mut self,
        identifier: String,
        secret: String,
        role: Role,
        profile: UserProfile,
        respond_to: ServiceResponse<User, AuthenticationError>,
    ) {
        debug!("Processing register request");

        let result = if self.credentials.contains_key(&identifier) {
            warn!("Identifier already registered");
            Err(AuthenticationError::AlreadyRegistered(identifier))
        } else {
            let id = format!("user_{}", self.next_id);
            self.next_id += 1;
            let user = User {
                id: id.clone(),
                role,
                profile,
            };
            self.users.insert(id.clone(), user.clone());
            self.insert_credential(identifier, &secret, id);
            info!(user_id = %user.id, "Account registered");
            Ok(user)
        };

        let _ = respond_to.send(result);
    }
}
