//! SKU view model

use serde::{Deserialize, Serialize};

/// Purchasable stock-keeping unit as rendered by the API
///
/// `price_cents` and `stock` are point-in-time reads; the commit path
/// re-validates both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuView {
    pub id: i64,
    pub name: String,
    /// Sales unit, e.g. "500g"
    pub unit: String,
    pub price_cents: i64,
    pub stock: i64,
    pub sales: i64,
    /// Parent product (SPU) grouping
    pub spu_id: i64,
    pub type_id: i64,
}
