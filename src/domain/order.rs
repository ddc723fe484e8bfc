use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an issued order. Paid orders move to exactly one of Redeemed
/// or Expired; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Redeemed,
    Expired,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Redeemed | OrderStatus::Expired)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::Redeemed => "redeemed",
            OrderStatus::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// A purchase of some quantity of one listing. `total_price` is quantity times
/// the discounted unit price, in minor units. The pickup code is the proof the
/// buyer presents at the counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub food_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub quantity: u32,
    pub total_price: u64,
    pub pickup_code: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Order {
    /// A paid order past its pickup deadline that nobody redeemed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Paid && now > self.expires_at
    }
}
