use thiserror::Error;

use crate::domain::Role;

/// Everything that can go wrong between "buy this" and a redeemed pickup.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Not signed in as {0}")]
    NotAuthenticated(String),
    #[error("Role {0} may not check out")]
    NotPermitted(Role),
    #[error("Listing not found: {0}")]
    ListingNotFound(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("{0}")]
    OutOfStock(String),
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),
    #[error("Payment timed out")]
    PaymentTimedOut,
    #[error("Payment still pending")]
    PaymentPending,
    #[error("Pickup code does not match")]
    CodeMismatch,
    #[error("Order already redeemed")]
    AlreadyRedeemed,
    #[error("Order expired")]
    OrderExpired,
    #[error("Checkout already in flight for key {0}")]
    CheckoutInFlight(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}
