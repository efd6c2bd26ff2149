//! Order row models

use serde::{Deserialize, Serialize};

/// Order header row
///
/// Created once by the commit engine with zero totals, totals written at
/// the end of the same transaction. `order_status` / `trade_no` are later
/// mutated only by payment reconciliation and comment submission.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderInfo {
    pub order_id: String,
    pub user_id: i64,
    pub addr_id: i64,
    pub pay_method: i64,
    pub total_count: i64,
    pub total_price_cents: i64,
    pub transit_price_cents: i64,
    pub order_status: i64,
    pub trade_no: Option<String>,
    pub created_at: i64,
}

/// Order line row — one per sku, immutable after commit except `comment`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: String,
    pub sku_id: i64,
    pub quantity: i64,
    /// Point-in-time copy of the sku price; never re-derived
    pub unit_price_cents: i64,
    pub comment: Option<String>,
}
