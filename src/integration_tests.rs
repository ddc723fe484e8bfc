#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc::error::TryRecvError;

    use crate::app_system::MarketSystem;
    use crate::clients::CatalogClient;
    use crate::config::SystemConfig;
    use crate::domain::{FoodListing, OrderStatus, Role, User, UserProfile};
    use crate::identity_actor::IdentityService;
    use crate::listing_actor::{ListingAction, ListingActionResult, ListingCreate};
    use crate::mock_framework::{
        create_mock_client, create_mock_identity, create_mock_session, expect_action, expect_get,
        FailingSessionStore,
    };
    use crate::order_actor::{
        ChargeOutcome, ChargeRequest, CheckoutError, CheckoutPolicy, OrderService, PaymentGateway,
        SimulatedGateway,
    };
    use crate::role_policy::{self, Route};
    use crate::session_actor::{
        MemorySessionStore, SessionError, SessionService, SessionStore, StorageError,
    };

    fn instant_gateway() -> Arc<SimulatedGateway> {
        Arc::new(SimulatedGateway::new(Duration::ZERO))
    }

    fn demo_listing(discounted_price: u32, quantity: u32) -> ListingCreate {
        ListingCreate {
            name: "Surprise pastry box".to_string(),
            description: "Whatever is left at closing".to_string(),
            image_url: String::new(),
            seller_id: "demo-restaurant".to_string(),
            original_price: discounted_price * 3,
            discounted_price,
            quantity_available: quantity,
        }
    }

    /// Declines the first charge it sees, approves the rest.
    struct FlakyGateway {
        refuse_next: AtomicBool,
    }

    impl FlakyGateway {
        fn new() -> Self {
            Self {
                refuse_next: AtomicBool::new(true),
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for FlakyGateway {
        async fn charge(&self, _request: ChargeRequest) -> ChargeOutcome {
            if self.refuse_next.swap(false, Ordering::SeqCst) {
                ChargeOutcome::Declined {
                    reason: "card refused".to_string(),
                }
            } else {
                ChargeOutcome::Paid {
                    reference: "flaky-ref".to_string(),
                }
            }
        }
    }

    #[tokio::test]
    async fn checkout_walks_the_catalog_protocol_in_order() {
        // Real identity and session actors, mock catalog: the test scripts
        // the catalog side and asserts what the engine sends it.
        let (identity_service, identity) = IdentityService::new(10);
        tokio::spawn(identity_service.run());
        let (session_service, session) =
            SessionService::new(10, identity, Arc::new(MemorySessionStore::default()));
        tokio::spawn(session_service.run());

        let buyer = session.login_as_demo(Role::Consumer).await.unwrap();

        let (catalog_inner, mut catalog_rx) = create_mock_client::<FoodListing>(10);
        let catalog = CatalogClient::new(catalog_inner);
        let (order_service, orders) = OrderService::new(
            10,
            session,
            catalog,
            instant_gateway(),
            CheckoutPolicy::default(),
        );
        tokio::spawn(order_service.run());

        let order_task = tokio::spawn({
            let buyer_id = buyer.id.clone();
            async move {
                orders
                    .submit_payment("food_1".to_string(), 2, buyer_id, "key-1".to_string())
                    .await
            }
        });

        // 1. The engine resolves the listing.
        let (listing_id, responder) = expect_get(&mut catalog_rx).await.expect("Expected Get");
        assert_eq!(listing_id, "food_1");
        let listing = FoodListing::new("food_1", "Surprise pastry box", "demo-restaurant", 1800, 600, 4);
        responder.send(Ok(Some(listing))).unwrap();

        // 2. Then reserves stock, before any money moves.
        let (listing_id, action, responder) =
            expect_action(&mut catalog_rx).await.expect("Expected Action");
        assert_eq!(listing_id, "food_1");
        match action {
            ListingAction::Reserve(qty) => assert_eq!(qty, 2),
            other => panic!("Unexpected action: {:?}", other),
        }
        responder
            .send(Ok(ListingActionResult::Reserved { remaining: 2 }))
            .unwrap();

        // 3. The approved charge mints the order.
        let order = order_task.await.unwrap().unwrap();
        assert_eq!(order.food_id, "food_1");
        assert_eq!(order.seller_id, "demo-restaurant");
        assert_eq!(order.total_price, 1200);
        assert_eq!(order.status, OrderStatus::Paid);

        // A successful checkout sends the catalog nothing further.
        assert!(matches!(catalog_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn demo_login_lands_each_role_on_its_route() {
        let config = SystemConfig::default();
        let system = MarketSystem::with_collaborators(
            &config,
            Arc::new(MemorySessionStore::default()),
            instant_gateway(),
        );

        assert_eq!(role_policy::landing_for(None), Route::Landing);

        for role in Role::ALL {
            let user = system.session_client.login_as_demo(role).await.unwrap();
            assert_eq!(user.role, role);

            let current = system.session_client.current_user().await.unwrap();
            assert_eq!(current.map(|u| u.role), Some(role));

            let expected = match role {
                Role::Consumer | Role::Ngo => Route::HomeFeed,
                Role::Restaurant | Role::Grocery => Route::SellerDashboard,
                Role::Admin => Route::AdminDashboard,
            };
            assert_eq!(role_policy::landing_route(role), expected);
        }

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn a_rescue_runs_from_login_to_redeemed_pickup() {
        let config = SystemConfig::default();
        let store = Arc::new(MemorySessionStore::default());
        let system = MarketSystem::with_collaborators(&config, store.clone(), instant_gateway());

        let listing_id = system
            .catalog_client
            .add_listing(demo_listing(500, 3))
            .await
            .unwrap();

        // The buyer signs in, buys every unit, and gets a pickup code.
        let buyer = system
            .session_client
            .login_as_demo(Role::Consumer)
            .await
            .unwrap();
        let order = system
            .order_client
            .submit_payment(listing_id.clone(), 3, buyer.id.clone(), "rescue-1".to_string())
            .await
            .unwrap();
        assert_eq!(order.total_price, 1500);
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(
            system
                .catalog_client
                .check_remaining(listing_id.clone())
                .await
                .unwrap(),
            0
        );
        assert!(system
            .catalog_client
            .get_listing(listing_id)
            .await
            .unwrap()
            .unwrap()
            .is_sold_out());

        // The seller redeems the code at the counter, once.
        let redeemed = system
            .order_client
            .redeem(order.id.clone(), order.pickup_code.clone())
            .await
            .unwrap();
        assert_eq!(redeemed.status, OrderStatus::Redeemed);
        assert_eq!(
            system
                .order_client
                .redeem(order.id.clone(), order.pickup_code.clone())
                .await
                .unwrap_err(),
            CheckoutError::AlreadyRedeemed
        );

        let sold = system
            .order_client
            .orders_for_seller("demo-restaurant".to_string())
            .await
            .unwrap();
        assert_eq!(sold.len(), 1);

        // Signing out leaves nothing behind, in memory or in the store.
        system.session_client.logout().await.unwrap();
        assert_eq!(system.session_client.current_user().await.unwrap(), None);
        assert_eq!(store.load_user().await.unwrap(), None);
        assert_eq!(store.load_token().await.unwrap(), None);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn bad_credentials_surface_the_identity_message() {
        let config = SystemConfig::default();
        let system = MarketSystem::with_collaborators(
            &config,
            Arc::new(MemorySessionStore::default()),
            instant_gateway(),
        );

        let err = system
            .session_client
            .login_with_credentials("nobody@example.com".to_string(), "wrong".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(system.session_client.current_user().await.unwrap(), None);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn restore_with_a_saved_user_makes_no_identity_traffic() {
        let (identity, mut identity_rx) = create_mock_identity(10);

        let store = Arc::new(MemorySessionStore::default());
        let saved = User::new("user_42", Role::Ngo, "City Harvest Collective", "ops@cityharvest.example");
        store.save_user(&saved).await.unwrap();

        let (session_service, session) = SessionService::new(10, identity, store);
        tokio::spawn(session_service.run());

        let restored = session.restore().await.unwrap();
        assert_eq!(restored, Some(saved));

        // The identity mailbox stayed untouched.
        assert!(matches!(identity_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn a_declined_charge_frees_the_stock_for_a_retry() {
        let config = SystemConfig::default();
        let system = MarketSystem::with_collaborators(
            &config,
            Arc::new(MemorySessionStore::default()),
            Arc::new(FlakyGateway::new()),
        );

        let listing_id = system
            .catalog_client
            .add_listing(demo_listing(900, 2))
            .await
            .unwrap();
        let buyer = system
            .session_client
            .login_as_demo(Role::Ngo)
            .await
            .unwrap();

        let err = system
            .order_client
            .submit_payment(listing_id.clone(), 2, buyer.id.clone(), "key-1".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::PaymentDeclined("card refused".to_string()));
        assert_eq!(
            system
                .catalog_client
                .check_remaining(listing_id.clone())
                .await
                .unwrap(),
            2
        );

        // A declined key is not burned; the retry succeeds.
        let order = system
            .order_client
            .submit_payment(listing_id.clone(), 2, buyer.id, "key-1".to_string())
            .await
            .unwrap();
        assert_eq!(order.total_price, 1800);
        assert_eq!(
            system
                .catalog_client
                .check_remaining(listing_id)
                .await
                .unwrap(),
            0
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn registered_accounts_sign_in_and_land_on_the_home_feed() {
        let config = SystemConfig::default();
        let system = MarketSystem::with_collaborators(
            &config,
            Arc::new(MemorySessionStore::default()),
            instant_gateway(),
        );

        let profile = UserProfile {
            display_name: "Morgan Reyes".to_string(),
            email: "morgan@example.org".to_string(),
            phone: None,
        };
        let registered = system
            .identity_client
            .register(
                "morgan@example.org".to_string(),
                "food4all".to_string(),
                Role::Consumer,
                profile.clone(),
            )
            .await
            .unwrap();
        assert_eq!(registered.id, "user_1");

        let signed_in = system
            .session_client
            .login_with_credentials("morgan@example.org".to_string(), "food4all".to_string())
            .await
            .unwrap();
        assert_eq!(signed_in.id, registered.id);
        assert_eq!(role_policy::landing_route(signed_in.role), Route::HomeFeed);

        // Second registration under the same identifier is refused.
        let err = system
            .identity_client
            .register(
                "morgan@example.org".to_string(),
                "other".to_string(),
                Role::Consumer,
                profile,
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Already registered: morgan@example.org");

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn broken_storage_degrades_restore_and_refuses_login() {
        let (identity_service, identity) = IdentityService::new(10);
        tokio::spawn(identity_service.run());
        let (session_service, session) =
            SessionService::new(10, identity, Arc::new(FailingSessionStore));
        tokio::spawn(session_service.run());

        // Restore cannot read the snapshot and degrades to signed-out.
        assert_eq!(session.restore().await.unwrap(), None);

        // Login refuses to claim success it could not persist.
        let err = session.login_as_demo(Role::Consumer).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Storage(StorageError::Unavailable(_))
        ));
        assert_eq!(session.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn checkout_reports_a_vanished_session_actor() {
        let (session, session_rx) = create_mock_session(10);
        drop(session_rx);

        let (catalog_inner, _catalog_rx) = create_mock_client::<FoodListing>(10);
        let (order_service, orders) = OrderService::new(
            10,
            session,
            CatalogClient::new(catalog_inner),
            instant_gateway(),
            CheckoutPolicy::default(),
        );
        tokio::spawn(order_service.run());

        let err = orders
            .submit_payment("food_1".to_string(), 1, "demo-consumer".to_string(), "k".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::ActorCommunication(_)));
    }
}
