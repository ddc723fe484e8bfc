mod domain;
mod clients;

mod app_system;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;

mod actor_framework;
mod config;
mod identity_actor;
mod listing_actor;
mod order_actor;
mod role_policy;
mod session_actor;

use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::app_system::{setup_tracing, MarketSystem};
use crate::config::SystemConfig;
use crate::domain::{Role, UserProfile};
use crate::listing_actor::sample_listings;
use crate::order_actor::CheckoutError;

#[tokio::main]
async fn main() -> Result<(), String> {
    // Tracing is process-wide, install it before anything logs
    setup_tracing();

    info!("Starting the food rescue marketplace");

    let config = SystemConfig::load("foodbridge.json").map_err(|e| e.to_string())?;
    let system = MarketSystem::new(&config);

    // Stock the shelves with the end-of-day surplus.
    let span = tracing::info_span!("catalog_seeding");
    async {
        for listing in sample_listings() {
            let name = listing.name.clone();
            let id = system
                .catalog_client
                .add_listing(listing)
                .await
                .map_err(|e| e.to_string())?;
            info!(listing_id = %id, name = %name, "Listing published");
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // A shopper arrives. A fresh install has nothing to restore, so they
    // sign in as the demo consumer.
    let span = tracing::info_span!("shopper_session");
    let buyer = async {
        if let Some(user) = system
            .session_client
            .restore()
            .await
            .map_err(|e| e.to_string())?
        {
            info!(user_id = %user.id, "Session restored from disk");
            return Ok(user);
        }
        let user = system
            .session_client
            .login_as_demo(Role::Consumer)
            .await
            .map_err(|e| e.to_string())?;
        info!(user_id = %user.id, route = %role_policy::landing_route(user.role), "Signed in");
        Ok::<_, String>(user)
    }
    .instrument(span)
    .await?;

    // Browse the feed and buy two of the first thing on it.
    let span = tracing::info_span!("checkout");
    let order = async {
        let listings = system
            .catalog_client
            .list_listings()
            .await
            .map_err(|e| e.to_string())?;
        for listing in &listings {
            info!(
                listing_id = %listing.id,
                name = %listing.name,
                price = listing.discounted_price,
                remaining = listing.quantity_available,
                "On the shelf"
            );
        }
        let pick = listings
            .iter()
            .find(|listing| !listing.is_sold_out())
            .cloned()
            .ok_or_else(|| "Nothing left on the shelf".to_string())?;

        let key = Uuid::new_v4().to_string();
        system
            .order_client
            .submit_payment(pick.id.clone(), 2, buyer.id.clone(), key)
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(
        order_id = %order.id,
        total_price = order.total_price,
        pickup_code = %order.pickup_code,
        "Order paid, show the code at the counter"
    );

    // At the counter the bistro clerk takes over the terminal. Their role
    // must allow redemption, and the code only works once.
    let span = tracing::info_span!("pickup");
    async {
        let clerk = system
            .session_client
            .login_as_demo(Role::Restaurant)
            .await
            .map_err(|e| e.to_string())?;
        info!(
            user_id = %clerk.id,
            routes = ?role_policy::allowed_routes(clerk.role),
            "Clerk signed in"
        );
        if !role_policy::may_redeem(clerk.role) {
            return Err(format!("Role {} may not redeem pickups", clerk.role));
        }

        let redeemed = system
            .order_client
            .redeem(order.id.clone(), order.pickup_code.clone())
            .await
            .map_err(|e| e.to_string())?;
        info!(order_id = %redeemed.id, "Pickup confirmed");

        match system
            .order_client
            .redeem(order.id.clone(), order.pickup_code.clone())
            .await
        {
            Err(CheckoutError::AlreadyRedeemed) => info!("Second redemption refused"),
            Ok(_) => error!("Second redemption unexpectedly succeeded"),
            Err(e) => error!(error = %e, "Second redemption failed for the wrong reason"),
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let sold = system
        .order_client
        .orders_for_seller(order.seller_id.clone())
        .await
        .map_err(|e| e.to_string())?;
    info!(seller_id = %order.seller_id, orders = sold.len(), "Seller dashboard");

    system.session_client.logout().await.map_err(|e| e.to_string())?;

    // A new neighbor joins with a real account and signs in with it.
    let span = tracing::info_span!("registration");
    async {
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
                profile,
            )
            .await
            .map_err(|e| e.to_string())?;
        info!(user_id = %registered.id, "Account created");

        let signed_in = system
            .session_client
            .login_with_credentials("morgan@example.org".to_string(), "food4all".to_string())
            .await
            .map_err(|e| e.to_string())?;
        info!(user_id = %signed_in.id, route = %role_policy::landing_route(signed_in.role), "Signed in with credentials");

        system.session_client.logout().await.map_err(|e| e.to_string())?;
        info!(route = %role_policy::landing_for(None), "Signed out, back to the landing page");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Drain the actors before the process exits
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Marketplace demo completed");
    Ok(())
}
