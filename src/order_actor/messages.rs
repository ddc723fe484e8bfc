use crate::actor_framework::ServiceResponse;
use crate::domain::Order;

use super::error::CheckoutError;
use super::payment::ChargeOutcome;

/// Caller-visible state of one idempotency key. `Unknown` also covers keys
/// whose checkout failed, so those may be retried.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutStatus {
    InFlight,
    Completed(String),
    Unknown,
}

#[derive(Debug)]
pub enum OrderRequest {
    SubmitPayment {
        listing_id: String,
        quantity: u32,
        buyer_id: String,
        idempotency_key: String,
        respond_to: ServiceResponse<Order, CheckoutError>,
    },
    Redeem {
        order_id: String,
        code: String,
        respond_to: ServiceResponse<Order, CheckoutError>,
    },
    ExpireOverdue {
        respond_to: ServiceResponse<usize, CheckoutError>,
    },
    CheckoutStatus {
        idempotency_key: String,
        respond_to: ServiceResponse<CheckoutStatus, CheckoutError>,
    },
    GetOrder {
        id: String,
        respond_to: ServiceResponse<Option<Order>, CheckoutError>,
    },
    OrdersForBuyer {
        buyer_id: String,
        respond_to: ServiceResponse<Vec<Order>, CheckoutError>,
    },
    OrdersForSeller {
        seller_id: String,
        respond_to: ServiceResponse<Vec<Order>, CheckoutError>,
    },
    /// Internal: posted back by the charge task once the gateway answers.
    Finalize {
        idempotency_key: String,
        outcome: ChargeOutcome,
    },
    Shutdown,
}
