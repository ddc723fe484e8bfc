use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::Order;
use crate::order_actor::{CheckoutError, CheckoutStatus, OrderRequest};

/// Client for the order issuance engine.
///
/// `submit_payment` resolves only once the charge settles. Callers that want
/// a non-blocking view poll `checkout_status` with the same idempotency key.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        debug!("Sending shutdown request");
        let _ = self.sender.send(OrderRequest::Shutdown).await;
    }
}

client_method!(OrderClient => fn submit_payment(listing_id: String, quantity: u32, buyer_id: String, idempotency_key: String) -> Order as OrderRequest::SubmitPayment, Error = CheckoutError);
client_method!(OrderClient => fn redeem(order_id: String, code: String) -> Order as OrderRequest::Redeem, Error = CheckoutError);
client_method!(OrderClient => fn expire_overdue() -> usize as OrderRequest::ExpireOverdue, Error = CheckoutError);
client_method!(OrderClient => fn checkout_status(idempotency_key: String) -> CheckoutStatus as OrderRequest::CheckoutStatus, Error = CheckoutError);
client_method!(OrderClient => fn get_order(id: String) -> Option<Order> as OrderRequest::GetOrder, Error = CheckoutError);
client_method!(OrderClient => fn orders_for_buyer(buyer_id: String) -> Vec<Order> as OrderRequest::OrdersForBuyer, Error = CheckoutError);
client_method!(OrderClient => fn orders_for_seller(seller_id: String) -> Vec<Order> as OrderRequest::OrdersForSeller, Error = CheckoutError);
