//! The payment capability behind checkout. Injectable so tests can answer
//! with any outcome deterministically.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

/// The money side of one checkout, as handed to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub buyer_id: String,
    pub listing_id: String,
    /// Total in minor currency units.
    pub amount: u64,
}

/// Every way a charge can end. All three are ordinary values, not errors;
/// the engine decides what each one means for the order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    Paid { reference: String },
    Declined { reason: String },
    TimedOut,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> ChargeOutcome;
}

/// Stand-in gateway: waits out a fixed latency, then approves everything.
pub struct SimulatedGateway {
    latency: Duration,
}

impl SimulatedGateway {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: ChargeRequest) -> ChargeOutcome {
        tokio::time::sleep(self.latency).await;
        let reference = format!("sim-{}", Uuid::new_v4());
        info!(
            buyer_id = %request.buyer_id,
            amount = request.amount,
            reference = %reference,
            "Simulated charge approved"
        );
        ChargeOutcome::Paid { reference }
    }
}
