// DTOs for FoodListing. Prices are minor currency units.

#[derive(Debug, Clone)]
pub struct ListingCreate {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub seller_id: String,
    pub original_price: u32,
    pub discounted_price: u32,
    pub quantity_available: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub original_price: Option<u32>,
    pub discounted_price: Option<u32>,
    pub quantity_available: Option<u32>,
}

/// The demo catalog. Seller ids match the demo directory so every listing
/// resolves to a real seller account.
pub fn sample_listings() -> Vec<ListingCreate> {
    vec![
        ListingCreate {
            name: "Surprise pastry box".to_string(),
            description: "Croissants and danishes left from this morning's bake".to_string(),
            image_url: "/images/pastry-box.jpg".to_string(),
            seller_id: "demo-restaurant".to_string(),
            original_price: 1800,
            discounted_price: 600,
            quantity_available: 4,
        },
        ListingCreate {
            name: "Day-end veggie crate".to_string(),
            description: "Mixed produce pulled from the shelves tonight".to_string(),
            image_url: "/images/veggie-crate.jpg".to_string(),
            seller_id: "demo-grocery".to_string(),
            original_price: 2400,
            discounted_price: 900,
            quantity_available: 6,
        },
        ListingCreate {
            name: "Soup and bread pairing".to_string(),
            description: "Today's soup with a half loaf of sourdough".to_string(),
            image_url: "/images/soup-bread.jpg".to_string(),
            seller_id: "demo-restaurant".to_string(),
            original_price: 1200,
            discounted_price: 500,
            quantity_available: 3,
        },
        ListingCreate {
            name: "Dairy shelf rescue bag".to_string(),
            description: "Yogurt and cheese close to their best-before date".to_string(),
            image_url: "/images/dairy-bag.jpg".to_string(),
            seller_id: "demo-grocery".to_string(),
            original_price: 1500,
            discounted_price: 500,
            quantity_available: 8,
        },
    ]
}
