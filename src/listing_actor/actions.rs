/// Custom actions for FoodListing entities.
///
/// Reservation and release run inside the catalog actor, so stock counts are
/// only ever touched by one task.
#[derive(Debug, Clone)]
pub enum ListingAction {
    /// Reads the remaining unit count without modifying it.
    CheckRemaining,
    /// Takes the given number of units out of stock.
    ///
    /// Refused when fewer units remain than requested; the count never goes
    /// negative.
    Reserve(u32),
    /// Returns previously reserved units, after a failed charge.
    Release(u32),
}

/// Results from ListingActions - variants match 1:1 with ListingAction
#[derive(Debug, Clone)]
pub enum ListingActionResult {
    Remaining(u32),
    Reserved { remaining: u32 },
    Released { remaining: u32 },
}
