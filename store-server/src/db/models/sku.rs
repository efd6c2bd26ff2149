//! SKU row model

use serde::{Deserialize, Serialize};
use shared::models::SkuView;

/// Stock-keeping unit row
///
/// `stock` and `sales` are mutated only through
/// [`SkuRepository::compare_and_swap_stock`](crate::db::repository::SkuRepository::compare_and_swap_stock).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sku {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub price_cents: i64,
    pub stock: i64,
    pub sales: i64,
    pub spu_id: i64,
    pub type_id: i64,
    pub is_active: i64,
}

impl From<Sku> for SkuView {
    fn from(s: Sku) -> Self {
        SkuView {
            id: s.id,
            name: s.name,
            unit: s.unit,
            price_cents: s.price_cents,
            stock: s.stock,
            sales: s.sales,
            spu_id: s.spu_id,
            type_id: s.type_id,
        }
    }
}
