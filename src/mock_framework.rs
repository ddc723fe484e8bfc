//! # Mock Framework
//!
//! Utilities for testing clients and actors in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then helpers
//! like [`expect_get`] or [`expect_action`] to assert what a caller sent.
//! [`create_mock_identity`] and [`create_mock_session`] do the same for the
//! message-enum actors, and [`FailingSessionStore`] exercises storage
//! degradation paths.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::clients::{IdentityClient, SessionClient};
use crate::domain::User;
use crate::identity_actor::IdentityRequest;
use crate::session_actor::{SessionRequest, SessionStore, StorageError};

/// Builds a client whose far end is the returned receiver instead of a
/// running [`crate::actor_framework::ResourceActor`].
///
/// # Testing Strategy
/// When a test cares about what the *caller* sends, spinning up the real
/// actor only adds noise. The mock client writes into a channel the test
/// holds. The test pulls each request off the receiver, asserts its shape,
/// and answers through the bundled `respond_to` sender with whatever outcome
/// the scenario calls for.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Mock identity handle: the receiver stands in for the identity actor.
pub fn create_mock_identity(
    buffer_size: usize,
) -> (IdentityClient, mpsc::Receiver<IdentityRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (IdentityClient::new(sender), receiver)
}

/// Mock session handle: the receiver stands in for the session actor.
pub fn create_mock_session(
    buffer_size: usize,
) -> (SessionClient, mpsc::Receiver<SessionRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (SessionClient::new(sender), receiver)
}

/// Pulls the next request and unpacks it as a Create, or returns None.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::CreatePayload,
    tokio::sync::oneshot::Sender<Result<T::Id, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create {
            payload,
            respond_to,
        }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Pulls the next request and unpacks it as a Get.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    tokio::sync::oneshot::Sender<Result<Option<T>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Pulls the next request and unpacks it as an Action, id and payload both.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    tokio::sync::oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Store whose every operation fails, for exercising degradation paths.
pub struct FailingSessionStore;

impl FailingSessionStore {
    fn refusal() -> StorageError {
        StorageError::Unavailable("session disk offline".to_string())
    }
}

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn load_user(&self) -> Result<Option<User>, StorageError> {
        Err(Self::refusal())
    }

    async fn save_user(&self, _user: &User) -> Result<(), StorageError> {
        Err(Self::refusal())
    }

    async fn load_token(&self) -> Result<Option<String>, StorageError> {
        Err(Self::refusal())
    }

    async fn save_token(&self, _token: &str) -> Result<(), StorageError> {
        Err(Self::refusal())
    }

    async fn clear_token(&self) -> Result<(), StorageError> {
        Err(Self::refusal())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Err(Self::refusal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FoodListing;
    use crate::listing_actor::ListingCreate;

    #[tokio::test]
    async fn mock_client_round_trips_a_create() {
        let (client, mut receiver) = create_mock_client::<FoodListing>(10);

        let create_task = tokio::spawn(async move {
            let listing = ListingCreate {
                name: "Surprise pastry box".to_string(),
                description: String::new(),
                image_url: String::new(),
                seller_id: "demo-restaurant".to_string(),
                original_price: 1800,
                discounted_price: 600,
                quantity_available: 4,
            };
            client.create(listing).await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "Surprise pastry box");
        responder.send(Ok("food_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("food_1".to_string()));
    }
}
