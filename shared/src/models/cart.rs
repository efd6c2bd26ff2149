//! Cart view models

use serde::{Deserialize, Serialize};

/// One cart line joined with its sku, subtotal computed in the projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    pub sku_id: i64,
    pub name: String,
    pub unit: String,
    pub price_cents: i64,
    pub quantity: i64,
    /// price_cents × quantity
    pub subtotal_cents: i64,
    /// Stock at read time, for the quantity stepper
    pub stock: i64,
}

/// Full cart display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// Total units across all lines
    pub total_count: i64,
    pub total_price_cents: i64,
}

/// Distinct-entry count, returned by every cart mutation (badge display)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CartBadge {
    pub total_count: u64,
}
