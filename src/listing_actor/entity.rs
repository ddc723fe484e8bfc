use crate::actor_framework::Entity;
use crate::domain::FoodListing;

use super::actions::{ListingAction, ListingActionResult};
use super::dtos::{ListingCreate, ListingPatch};

impl Entity for FoodListing {
    type Id = String;
    type CreatePayload = ListingCreate;
    type Patch = ListingPatch;
    type Action = ListingAction;
    type ActionResult = ListingActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a listing. The discount invariant holds from the start:
    /// `discounted_price` never exceeds `original_price`.
    fn from_create(id: String, payload: ListingCreate) -> Result<Self, String> {
        if payload.name.trim().is_empty() {
            return Err("Listing name required".to_string());
        }
        if payload.discounted_price > payload.original_price {
            return Err(format!(
                "Discounted price {} exceeds original price {}",
                payload.discounted_price, payload.original_price
            ));
        }
        Ok(Self {
            id,
            name: payload.name,
            description: payload.description,
            image_url: payload.image_url,
            seller_id: payload.seller_id,
            original_price: payload.original_price,
            discounted_price: payload.discounted_price,
            quantity_available: payload.quantity_available,
        })
    }

    /// Applies a patch, re-checking the discount invariant against the
    /// combination of patched and existing prices.
    fn on_update(&mut self, patch: ListingPatch) -> Result<(), String> {
        let original = patch.original_price.unwrap_or(self.original_price);
        let discounted = patch.discounted_price.unwrap_or(self.discounted_price);
        if discounted > original {
            return Err(format!(
                "Discounted price {} exceeds original price {}",
                discounted, original
            ));
        }
        self.original_price = original;
        self.discounted_price = discounted;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(quantity) = patch.quantity_available {
            self.quantity_available = quantity;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ListingAction) -> Result<ListingActionResult, String> {
        match action {
            ListingAction::CheckRemaining => {
                Ok(ListingActionResult::Remaining(self.quantity_available))
            }
            ListingAction::Reserve(amount) => {
                if self.quantity_available >= amount {
                    self.quantity_available -= amount;
                    Ok(ListingActionResult::Reserved {
                        remaining: self.quantity_available,
                    })
                } else {
                    Err(format!(
                        "Insufficient stock: {} available, {} requested",
                        self.quantity_available, amount
                    ))
                }
            }
            ListingAction::Release(amount) => {
                self.quantity_available = self.quantity_available.saturating_add(amount);
                Ok(ListingActionResult::Released {
                    remaining: self.quantity_available,
                })
            }
        }
    }
}
