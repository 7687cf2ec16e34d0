use serde::{Deserialize, Serialize};

// --- Catalog ---

/// A product as the store backend returns it, already translated for the
/// requested locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: u64,
    pub currency: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
}

// --- Coupons ---

/// A coupon the backend accepted for a given subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDiscount {
    pub code: String,
    pub discount_cents: u64,
}

// --- Accounts ---

/// The signed-in shopper, as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
}
