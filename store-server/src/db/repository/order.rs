//! Order Repository
//!
//! Transaction-scoped writes for the commit engine plus read paths for
//! order history. Status transitions are conditional updates so that the
//! reconciler and the comment flow cannot clobber each other.

use super::{RepoError, RepoResult};
use crate::db::models::{OrderInfo, OrderLine};
use shared::models::OrderStatus;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone, Debug)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========== Transaction-scoped writes (commit engine) ==========

    /// Insert the order header with zero totals
    pub async fn create_tx(
        conn: &mut SqliteConnection,
        order_id: &str,
        user_id: i64,
        addr_id: i64,
        pay_method: i64,
        transit_price_cents: i64,
        created_at: i64,
    ) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO order_info \
             (order_id, user_id, addr_id, pay_method, total_count, total_price_cents, \
              transit_price_cents, order_status, trade_no, created_at) \
             VALUES (?, ?, ?, ?, 0, 0, ?, ?, NULL, ?)",
        )
        .bind(order_id)
        .bind(user_id)
        .bind(addr_id)
        .bind(pay_method)
        .bind(transit_price_cents)
        .bind(OrderStatus::Unpaid as i32)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Insert one order line with its point-in-time unit price
    pub async fn insert_line_tx(
        conn: &mut SqliteConnection,
        order_id: &str,
        sku_id: i64,
        quantity: i64,
        unit_price_cents: i64,
    ) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO order_line (order_id, sku_id, quantity, unit_price_cents, comment) \
             VALUES (?, ?, ?, ?, NULL)",
        )
        .bind(order_id)
        .bind(sku_id)
        .bind(quantity)
        .bind(unit_price_cents)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Write the accumulated totals onto the order header
    pub async fn update_totals_tx(
        conn: &mut SqliteConnection,
        order_id: &str,
        total_count: i64,
        total_price_cents: i64,
    ) -> RepoResult<()> {
        sqlx::query(
            "UPDATE order_info SET total_count = ?, total_price_cents = ? WHERE order_id = ?",
        )
        .bind(total_count)
        .bind(total_price_cents)
        .bind(order_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    // ========== Read paths ==========

    /// Find an order owned by the given user
    pub async fn find_for_user(
        &self,
        order_id: &str,
        user_id: i64,
    ) -> RepoResult<Option<OrderInfo>> {
        let order = sqlx::query_as::<_, OrderInfo>(
            "SELECT * FROM order_info WHERE order_id = ? AND user_id = ?",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    /// The user's orders, newest first
    pub async fn find_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<OrderInfo>> {
        let orders = sqlx::query_as::<_, OrderInfo>(
            "SELECT * FROM order_info WHERE user_id = ? \
             ORDER BY created_at DESC, order_id DESC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    /// Total number of orders for pagination
    pub async fn count_by_user(&self, user_id: i64) -> RepoResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM order_info WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// All lines of one order, in insertion order
    pub async fn lines_for_order(&self, order_id: &str) -> RepoResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT * FROM order_line WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    // ========== Status transitions ==========

    /// Unpaid → AwaitingComment, recording the gateway's trade number
    ///
    /// Conditional on the current status so a late reconciler cannot
    /// overwrite a later transition. Returns `false` if the order was not
    /// in `Unpaid`.
    pub async fn mark_paid(&self, order_id: &str, trade_no: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE order_info SET order_status = ?, trade_no = ? \
             WHERE order_id = ? AND order_status = ?",
        )
        .bind(OrderStatus::AwaitingComment as i32)
        .bind(trade_no)
        .bind(order_id)
        .bind(OrderStatus::Unpaid as i32)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// AwaitingComment → Completed, after comment submission
    pub async fn mark_completed(&self, order_id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE order_info SET order_status = ? \
             WHERE order_id = ? AND order_status = ?",
        )
        .bind(OrderStatus::Completed as i32)
        .bind(order_id)
        .bind(OrderStatus::AwaitingComment as i32)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Store a buyer comment on one line; absent (order, sku) pairs are
    /// skipped by the caller, matching the submission flow
    pub async fn set_line_comment(
        &self,
        order_id: &str,
        sku_id: i64,
        content: &str,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE order_line SET comment = ? WHERE order_id = ? AND sku_id = ?",
        )
        .bind(content)
        .bind(order_id)
        .bind(sku_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Lookup without the ownership filter (reconciler-internal)
    pub async fn find_by_id(&self, order_id: &str) -> RepoResult<OrderInfo> {
        let order = sqlx::query_as::<_, OrderInfo>(
            "SELECT * FROM order_info WHERE order_id = ?",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        order.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
    }
}
