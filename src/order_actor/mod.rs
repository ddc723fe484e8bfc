//! The order issuance engine: turns a listing plus a paid charge into a
//! redeemable order.
//!
//! The engine is a root actor orchestrating the session, catalog, and payment
//! collaborators. Charges run off the actor loop: a spawned task awaits the
//! gateway and posts the outcome back as a `Finalize` message, so the engine
//! keeps serving reads and redemptions while money moves. Exactly one
//! response reaches each submitter, through the oneshot kept in the pending
//! table.

pub mod error;
pub mod messages;
pub mod payment;
pub mod pickup_code;

pub use error::CheckoutError;
pub use messages::{CheckoutStatus, OrderRequest};
pub use payment::{ChargeOutcome, ChargeRequest, PaymentGateway, SimulatedGateway};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ServiceResponse;
use crate::clients::{CatalogClient, OrderClient, SessionClient};
use crate::domain::{Order, OrderStatus};
use crate::listing_actor::CatalogError;
use crate::role_policy;

/// Checkout tunables, taken from configuration at system startup.
#[derive(Debug, Clone)]
pub struct CheckoutPolicy {
    /// How long a paid order stays redeemable.
    pub pickup_window: chrono::Duration,
    /// Characters in a pickup code.
    pub code_length: usize,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            pickup_window: chrono::Duration::minutes(30),
            code_length: pickup_code::DEFAULT_CODE_LENGTH,
        }
    }
}

/// Everything needed to finish a checkout once the charge answers. The
/// submitter's response channel waits in here while the gateway thinks.
struct PendingCheckout {
    listing_id: String,
    seller_id: String,
    buyer_id: String,
    quantity: u32,
    unit_price: u32,
    respond_to: ServiceResponse<Order, CheckoutError>,
}

pub struct OrderService {
    receiver: mpsc::Receiver<OrderRequest>,
    /// Charge tasks post `Finalize` back through this.
    self_sender: mpsc::Sender<OrderRequest>,
    session: SessionClient,
    catalog: CatalogClient,
    gateway: Arc<dyn PaymentGateway>,
    policy: CheckoutPolicy,
    orders: HashMap<String, Order>,
    /// Codes attached to currently redeemable orders. Minting regenerates
    /// against this set, so two live orders never share a code.
    outstanding_codes: HashSet<String>,
    /// Idempotency key → checkout awaiting its charge outcome.
    pending: HashMap<String, PendingCheckout>,
    /// Idempotency key → order id, for replaying completed checkouts.
    completed: HashMap<String, String>,
    next_id: u64,
}

impl OrderService {
    pub fn new(
        buffer_size: usize,
        session: SessionClient,
        catalog: CatalogClient,
        gateway: Arc<dyn PaymentGateway>,
        policy: CheckoutPolicy,
    ) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            self_sender: sender.clone(),
            session,
            catalog,
            gateway,
            policy,
            orders: HashMap::new(),
            outstanding_codes: HashSet::new(),
            pending: HashMap::new(),
            completed: HashMap::new(),
            next_id: 1,
        };
        let client = OrderClient::new(sender);
        (service, client)
    }

    #[instrument(name = "order_service", skip(self))]
    pub async fn run(mut self) {
        info!("OrderService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::SubmitPayment {
                    listing_id,
                    quantity,
                    buyer_id,
                    idempotency_key,
                    respond_to,
                } => {
                    self.handle_submit_payment(
                        listing_id,
                        quantity,
                        buyer_id,
                        idempotency_key,
                        respond_to,
                    )
                    .await;
                }
                OrderRequest::Finalize {
                    idempotency_key,
                    outcome,
                } => {
                    self.handle_finalize(idempotency_key, outcome).await;
                }
                OrderRequest::Redeem {
                    order_id,
                    code,
                    respond_to,
                } => {
                    self.handle_redeem(order_id, code, respond_to);
                }
                OrderRequest::ExpireOverdue { respond_to } => {
                    self.handle_expire_overdue(respond_to);
                }
                OrderRequest::CheckoutStatus {
                    idempotency_key,
                    respond_to,
                } => {
                    self.handle_checkout_status(idempotency_key, respond_to);
                }
                OrderRequest::GetOrder { id, respond_to } => {
                    self.handle_get_order(id, respond_to);
                }
                OrderRequest::OrdersForBuyer {
                    buyer_id,
                    respond_to,
                } => {
                    self.handle_orders_for_buyer(buyer_id, respond_to);
                }
                OrderRequest::OrdersForSeller {
                    seller_id,
                    respond_to,
                } => {
                    self.handle_orders_for_seller(seller_id, respond_to);
                }
                OrderRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
            }
        }

        info!("OrderService stopped");
    }

    /// The checkout protocol up to the charge: validate, authenticate the
    /// buyer, resolve the listing, reserve stock, then hand off to the
    /// gateway task. The response is delivered by `handle_finalize`.
    #[instrument(
        fields(listing_id = %listing_id, quantity = quantity, buyer_id = %buyer_id, key = %idempotency_key),
        skip_all
    )]
    async fn handle_submit_payment(
        &mut self,
        listing_id: String,
        quantity: u32,
        buyer_id: String,
        idempotency_key: String,
        respond_to: ServiceResponse<Order, CheckoutError>,
    ) {
        debug!("Processing submit_payment request");

        if quantity < 1 {
            let _ = respond_to.send(Err(CheckoutError::InvalidQuantity(quantity)));
            return;
        }

        // A finished key replays its order; an in-flight key is refused.
        if let Some(order_id) = self.completed.get(&idempotency_key) {
            info!(order_id = %order_id, "Idempotent replay of a completed checkout");
            let replay = self
                .orders
                .get(order_id)
                .cloned()
                .ok_or_else(|| CheckoutError::OrderNotFound(order_id.clone()));
            let _ = respond_to.send(replay);
            return;
        }
        if self.pending.contains_key(&idempotency_key) {
            debug!("Duplicate submission while charge is pending");
            let _ = respond_to.send(Err(CheckoutError::CheckoutInFlight(idempotency_key)));
            return;
        }

        // The buyer must be the signed-in user, with a role that buys.
        let current = match self.session.current_user().await {
            Ok(user) => user,
            Err(e) => {
                let _ = respond_to.send(Err(CheckoutError::ActorCommunication(e.to_string())));
                return;
            }
        };
        let buyer = match current {
            Some(user) if user.id == buyer_id => user,
            _ => {
                warn!("Checkout without a matching signed-in buyer");
                let _ = respond_to.send(Err(CheckoutError::NotAuthenticated(buyer_id)));
                return;
            }
        };
        if !role_policy::may_checkout(buyer.role) {
            warn!(role = %buyer.role, "Role may not check out");
            let _ = respond_to.send(Err(CheckoutError::NotPermitted(buyer.role)));
            return;
        }

        let listing = match self.catalog.get_listing(listing_id.clone()).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                let _ = respond_to.send(Err(CheckoutError::ListingNotFound(listing_id)));
                return;
            }
            Err(e) => {
                let _ = respond_to.send(Err(CheckoutError::ActorCommunication(e.to_string())));
                return;
            }
        };

        // Atomic decrement-if-positive inside the catalog actor.
        if let Err(e) = self.catalog.reserve(listing_id.clone(), quantity).await {
            let err = match e {
                CatalogError::OutOfStock(detail) => CheckoutError::OutOfStock(detail),
                other => CheckoutError::ActorCommunication(other.to_string()),
            };
            let _ = respond_to.send(Err(err));
            return;
        }

        let request = ChargeRequest {
            buyer_id: buyer_id.clone(),
            listing_id: listing_id.clone(),
            amount: listing.discounted_price as u64 * quantity as u64,
        };
        self.pending.insert(
            idempotency_key.clone(),
            PendingCheckout {
                listing_id,
                seller_id: listing.seller_id,
                buyer_id,
                quantity,
                unit_price: listing.discounted_price,
                respond_to,
            },
        );

        // Charge off the loop; the engine stays responsive while money moves.
        let gateway = Arc::clone(&self.gateway);
        let engine = self.self_sender.clone();
        tokio::spawn(async move {
            let outcome = gateway.charge(request).await;
            let finalize = OrderRequest::Finalize {
                idempotency_key,
                outcome,
            };
            if engine.send(finalize).await.is_err() {
                warn!("Order engine gone before the charge outcome could be delivered");
            }
        });
    }

    /// Second half of the checkout. Paid mints the order; anything else
    /// releases the reservation and leaves no order behind.
    #[instrument(fields(key = %idempotency_key), skip_all)]
    async fn handle_finalize(&mut self, idempotency_key: String, outcome: ChargeOutcome) {
        debug!("Processing charge outcome");

        let Some(pending) = self.pending.remove(&idempotency_key) else {
            warn!("Charge outcome for an unknown checkout");
            return;
        };

        match outcome {
            ChargeOutcome::Paid { reference } => {
                let id = format!("order_{}", self.next_id);
                self.next_id += 1;
                let code = pickup_code::mint(self.policy.code_length, &self.outstanding_codes);
                self.outstanding_codes.insert(code.clone());

                let created_at = Utc::now();
                let order = Order {
                    id: id.clone(),
                    food_id: pending.listing_id,
                    buyer_id: pending.buyer_id,
                    seller_id: pending.seller_id,
                    quantity: pending.quantity,
                    total_price: pending.unit_price as u64 * pending.quantity as u64,
                    pickup_code: code,
                    status: OrderStatus::Paid,
                    created_at,
                    expires_at: created_at + self.policy.pickup_window,
                };
                self.orders.insert(id.clone(), order.clone());
                self.completed.insert(idempotency_key, id.clone());

                info!(
                    order_id = %id,
                    reference = %reference,
                    total_price = order.total_price,
                    "Order issued"
                );
                let _ = pending.respond_to.send(Ok(order));
            }
            ChargeOutcome::Declined { reason } => {
                self.release_reservation(&pending.listing_id, pending.quantity)
                    .await;
                info!(reason = %reason, "Charge declined, reservation released");
                let _ = pending
                    .respond_to
                    .send(Err(CheckoutError::PaymentDeclined(reason)));
            }
            ChargeOutcome::TimedOut => {
                self.release_reservation(&pending.listing_id, pending.quantity)
                    .await;
                warn!("Charge timed out, reservation released");
                let _ = pending.respond_to.send(Err(CheckoutError::PaymentTimedOut));
            }
        }
    }

    async fn release_reservation(&self, listing_id: &str, quantity: u32) {
        if let Err(e) = self.catalog.release(listing_id.to_string(), quantity).await {
            warn!(error = %e, listing_id = %listing_id, "Could not release reservation");
        }
    }

    /// Redemption closes the loop at the counter. The code must match
    /// exactly; a paid order past its window expires here instead.
    #[instrument(fields(order_id = %order_id), skip(self, order_id, code, respond_to))]
    fn handle_redeem(
        &mut self,
        order_id: String,
        code: String,
        respond_to: ServiceResponse<Order, CheckoutError>,
    ) {
        debug!("Processing redeem request");

        let Some(order) = self.orders.get_mut(&order_id) else {
            let _ = respond_to.send(Err(CheckoutError::OrderNotFound(order_id)));
            return;
        };

        let result = match order.status {
            OrderStatus::PendingPayment => Err(CheckoutError::PaymentPending),
            OrderStatus::Redeemed => Err(CheckoutError::AlreadyRedeemed),
            OrderStatus::Expired => Err(CheckoutError::OrderExpired),
            OrderStatus::Paid => {
                if order.is_overdue(Utc::now()) {
                    order.status = OrderStatus::Expired;
                    self.outstanding_codes.remove(&order.pickup_code);
                    warn!("Pickup window elapsed, order expired");
                    Err(CheckoutError::OrderExpired)
                } else if !pickup_code::matches(&order.pickup_code, &code) {
                    warn!("Pickup code mismatch");
                    Err(CheckoutError::CodeMismatch)
                } else {
                    order.status = OrderStatus::Redeemed;
                    self.outstanding_codes.remove(&order.pickup_code);
                    info!(buyer_id = %order.buyer_id, "Order redeemed");
                    Ok(order.clone())
                }
            }
        };

        let _ = respond_to.send(result);
    }

    /// Sweeps every paid order past its window to Expired. The trigger is
    /// external; this only applies the state change.
    #[instrument(skip(self, respond_to))]
    fn handle_expire_overdue(&mut self, respond_to: ServiceResponse<usize, CheckoutError>) {
        debug!("Processing expire_overdue request");

        let now = Utc::now();
        let mut expired = 0;
        for order in self.orders.values_mut() {
            if order.status.is_terminal() {
                continue;
            }
            if order.is_overdue(now) {
                order.status = OrderStatus::Expired;
                self.outstanding_codes.remove(&order.pickup_code);
                expired += 1;
            }
        }

        if expired > 0 {
            info!(count = expired, "Swept overdue orders");
        }
        let _ = respond_to.send(Ok(expired));
    }

    #[instrument(fields(key = %idempotency_key), skip(self, idempotency_key, respond_to))]
    fn handle_checkout_status(
        &self,
        idempotency_key: String,
        respond_to: ServiceResponse<CheckoutStatus, CheckoutError>,
    ) {
        debug!("Processing checkout_status request");

        let status = if self.pending.contains_key(&idempotency_key) {
            CheckoutStatus::InFlight
        } else if let Some(order_id) = self.completed.get(&idempotency_key) {
            CheckoutStatus::Completed(order_id.clone())
        } else {
            CheckoutStatus::Unknown
        };

        let _ = respond_to.send(Ok(status));
    }

    #[instrument(fields(order_id = %id), skip(self, id, respond_to))]
    fn handle_get_order(
        &self,
        id: String,
        respond_to: ServiceResponse<Option<Order>, CheckoutError>,
    ) {
        debug!("Processing get_order request");
        let _ = respond_to.send(Ok(self.orders.get(&id).cloned()));
    }

    #[instrument(fields(buyer_id = %buyer_id), skip(self, buyer_id, respond_to))]
    fn handle_orders_for_buyer(
        &self,
        buyer_id: String,
        respond_to: ServiceResponse<Vec<Order>, CheckoutError>,
    ) {
        debug!("Processing orders_for_buyer request");
        let _ = respond_to.send(Ok(self.orders_matching(|o| o.buyer_id == buyer_id)));
    }

    #[instrument(fields(seller_id = %seller_id), skip(self, seller_id, respond_to))]
    fn handle_orders_for_seller(
        &self,
        seller_id: String,
        respond_to: ServiceResponse<Vec<Order>, CheckoutError>,
    ) {
        debug!("Processing orders_for_seller request");
        let _ = respond_to.send(Ok(self.orders_matching(|o| o.seller_id == seller_id)));
    }

    /// Chronological, oldest first.
    fn orders_matching(&self, keep: impl Fn(&Order) -> bool) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.values().filter(|o| keep(o)).cloned().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        orders
    }
}
