use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::app_system::SystemError;
use crate::clients::{CatalogClient, IdentityClient, OrderClient, SessionClient};
use crate::config::SystemConfig;
use crate::domain::FoodListing;
use crate::identity_actor::IdentityService;
use crate::order_actor::{CheckoutPolicy, OrderService, PaymentGateway, SimulatedGateway};
use crate::session_actor::{demo_users, FileSessionStore, SessionService, SessionStore};

/// The assembled marketplace: identity, session, catalog, and order actors
/// wired together behind their clients.
///
/// Responsible for starting the actors in dependency order, seeding the demo
/// directory, and shutting everything down cleanly.
pub struct MarketSystem {
    pub identity_client: IdentityClient,
    pub session_client: SessionClient,
    pub catalog_client: CatalogClient,
    pub order_client: OrderClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MarketSystem {
    pub fn new(config: &SystemConfig) -> Self {
        let store = Arc::new(FileSessionStore::new(config.session_dir.clone()));
        let gateway = Arc::new(SimulatedGateway::new(Duration::from_millis(
            config.payment_latency_ms,
        )));
        Self::with_collaborators(config, store, gateway)
    }

    /// Assembly with injected storage and payment collaborators.
    pub fn with_collaborators(
        config: &SystemConfig,
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        // 1. Identity, seeded with the demo directory so seller ids on the
        // sample listings resolve.
        let (mut identity_service, identity_client) = IdentityService::new(config.channel_capacity);
        for user in demo_users() {
            identity_service.seed_user(user);
        }
        let identity_handle = tokio::spawn(identity_service.run());

        // 2. Session, on top of identity and the snapshot store.
        let (session_service, session_client) =
            SessionService::new(config.channel_capacity, identity_client.clone(), store);
        let session_handle = tokio::spawn(session_service.run());

        // 3. Catalog.
        let listing_id_counter = Arc::new(AtomicU64::new(1));
        let next_listing_id = move || {
            let id = listing_id_counter.fetch_add(1, Ordering::SeqCst);
            format!("food_{}", id)
        };
        let (catalog_actor, catalog_resource_client) =
            ResourceActor::<FoodListing>::new(config.channel_capacity, next_listing_id);
        let catalog_client = CatalogClient::new(catalog_resource_client);
        let catalog_handle = tokio::spawn(catalog_actor.run());

        // 4. Order engine, on top of session, catalog, and the gateway.
        let policy = CheckoutPolicy {
            pickup_window: chrono::Duration::minutes(config.pickup_window_minutes),
            code_length: config.pickup_code_length,
        };
        let (order_service, order_client) = OrderService::new(
            config.channel_capacity,
            session_client.clone(),
            catalog_client.clone(),
            gateway,
            policy,
        );
        let order_handle = tokio::spawn(order_service.run());

        Self {
            identity_client,
            session_client,
            catalog_client,
            order_client,
            handles: vec![
                identity_handle,
                session_handle,
                catalog_handle,
                order_handle,
            ],
        }
    }

    /// Stops the actors in reverse dependency order and waits for each task.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        // Message-loop actors take an explicit Shutdown; the catalog stops
        // once the last clone of its client drops.
        self.order_client.shutdown().await;
        self.session_client.shutdown().await;
        self.identity_client.shutdown().await;

        drop(self.order_client);
        drop(self.session_client);
        drop(self.identity_client);
        drop(self.catalog_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorJoin(format!("{:?}", e)));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
