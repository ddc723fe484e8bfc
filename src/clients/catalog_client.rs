use tracing::{debug, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::FoodListing;
use crate::listing_actor::{CatalogError, ListingAction, ListingActionResult, ListingCreate};

/// Client for the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<FoodListing>,
}

impl_basic_client!(CatalogClient, FoodListing, CatalogError, listing);

impl CatalogClient {
    #[instrument(skip(self, listing), fields(name = %listing.name, seller_id = %listing.seller_id))]
    pub async fn add_listing(&self, listing: ListingCreate) -> Result<String, CatalogError> {
        debug!("Sending request");
        self.inner.create(listing).await.map_err(CatalogError::from)
    }

    #[instrument(skip(self))]
    pub async fn check_remaining(&self, id: String) -> Result<u32, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ListingAction::CheckRemaining).await {
            Ok(ListingActionResult::Remaining(level)) => Ok(level),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(CatalogError::from(e)),
        }
    }

    /// Decrement-if-positive inside the catalog actor. Refusals surface as
    /// `OutOfStock` with the stock detail.
    #[instrument(skip(self))]
    pub async fn reserve(&self, id: String, quantity: u32) -> Result<u32, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ListingAction::Reserve(quantity)).await {
            Ok(ListingActionResult::Reserved { remaining }) => Ok(remaining),
            Ok(other) => Err(unexpected(other)),
            Err(FrameworkError::Rejected(detail)) => Err(CatalogError::OutOfStock(detail)),
            Err(e) => Err(CatalogError::from(e)),
        }
    }

    /// Compensation for a reservation whose checkout did not complete.
    #[instrument(skip(self))]
    pub async fn release(&self, id: String, quantity: u32) -> Result<u32, CatalogError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ListingAction::Release(quantity)).await {
            Ok(ListingActionResult::Released { remaining }) => Ok(remaining),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(CatalogError::from(e)),
        }
    }
}

fn unexpected(result: ListingActionResult) -> CatalogError {
    CatalogError::ActorCommunication(format!("Unexpected action result: {:?}", result))
}
