use serde::{Deserialize, Serialize};

/// A surplus-food offer published by a seller. Prices are in minor currency
/// units (cents); quantity counts remaining portions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodListing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub seller_id: String,
    pub original_price: u32,
    pub discounted_price: u32,
    pub quantity_available: u32,
}

impl FoodListing {
    #[allow(dead_code)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        seller_id: impl Into<String>,
        original_price: u32,
        discounted_price: u32,
        quantity_available: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            image_url: String::new(),
            seller_id: seller_id.into(),
            original_price,
            discounted_price,
            quantity_available,
        }
    }

    pub fn is_sold_out(&self) -> bool {
        self.quantity_available == 0
    }
}
