use serde::{Deserialize, Serialize};

use crate::types::{CouponDiscount, Product};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: u64,
    pub currency: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total_cents(&self) -> u64 {
        self.unit_price_cents.saturating_mul(u64::from(self.quantity))
    }
}

/// A shopper's cart. Prices are captured when the line is added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub coupon: Option<CouponDiscount>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).fold(0, u32::saturating_add)
    }

    /// Add `quantity` of `product`, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price_cents: product.price_cents,
                currency: product.currency.clone(),
                quantity,
            }),
        }
    }

    /// Remove a product. An emptied cart loses its coupon too.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.is_empty() {
            self.coupon = None;
        }
    }

    pub fn apply_coupon(&mut self, discount: CouponDiscount) {
        self.coupon = Some(discount);
    }

    pub fn clear_coupon(&mut self) {
        self.coupon = None;
    }

    pub fn subtotal_cents(&self) -> u64 {
        self.lines
            .iter()
            .map(CartLine::line_total_cents)
            .fold(0, u64::saturating_add)
    }

    /// The coupon discount, never more than the subtotal.
    pub fn discount_cents(&self) -> u64 {
        self.coupon
            .as_ref()
            .map(|c| c.discount_cents.min(self.subtotal_cents()))
            .unwrap_or(0)
    }

    pub fn total_cents(&self) -> u64 {
        self.subtotal_cents() - self.discount_cents()
    }

    /// Currency of the cart, taken from its first line.
    pub fn currency(&self) -> Option<&str> {
        self.lines.first().map(|l| l.currency.as_str())
    }
}

/// Render minor units as `12.50 USD`.
pub fn format_price(cents: u64, currency: &str) -> String {
    format!("{}.{:02} {currency}", cents / 100, cents % 100)
}
