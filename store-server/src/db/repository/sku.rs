//! SKU Repository — the inventory ledger
//!
//! Point-in-time stock reads plus the compare-and-swap stock update. The
//! conditional `UPDATE ... WHERE id = ? AND stock = ?` is the sole
//! sanctioned mutation path for `stock`/`sales`: a blind write would allow
//! two concurrent commits to both decrement from the same observed value.

use super::{RepoError, RepoResult};
use crate::db::models::Sku;
use crate::orders::stock;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone, Debug)]
pub struct SkuRepository {
    pool: SqlitePool,
}

impl SkuRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find sku by id
    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Sku>> {
        let sku = sqlx::query_as::<_, Sku>("SELECT * FROM sku WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sku)
    }

    /// Find all active skus, ordered for catalog display
    pub async fn find_active(&self) -> RepoResult<Vec<Sku>> {
        let skus = sqlx::query_as::<_, Sku>(
            "SELECT * FROM sku WHERE is_active = 1 ORDER BY type_id, spu_id, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(skus)
    }

    /// Point-in-time (stock, price) read, pool-scoped
    pub async fn get_stock(&self, id: i64) -> RepoResult<Option<(i64, i64)>> {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT stock, price_cents FROM sku WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    /// Read (stock, sales, price) on a transaction's connection
    ///
    /// Used by the commit engine so the read and the subsequent
    /// compare-and-swap observe the same connection state.
    pub async fn read_stock_tx(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> RepoResult<Option<(i64, i64, i64)>> {
        let row: Option<(i64, i64, i64)> =
            sqlx::query_as("SELECT stock, sales, price_cents FROM sku WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(row)
    }

    /// Conditional stock/sales update on a transaction's connection
    ///
    /// Returns `true` iff the persisted stock still equals
    /// `expected_stock` and the row was updated. A `false` return means
    /// another commit won the race; the caller decides whether to retry.
    pub async fn compare_and_swap_stock(
        conn: &mut SqliteConnection,
        id: i64,
        expected_stock: i64,
        new_stock: i64,
        new_sales: i64,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE sku SET stock = ?, sales = ? WHERE id = ? AND stock = ?",
        )
        .bind(new_stock)
        .bind(new_sales)
        .bind(id)
        .bind(expected_stock)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Add stock back to a sku (restock), through the same CAS path
    ///
    /// Retried up to the standard attempt bound under contention.
    pub async fn restock(&self, id: i64, quantity: i64) -> RepoResult<Sku> {
        if quantity <= 0 {
            return Err(RepoError::Validation("restock quantity must be positive".into()));
        }
        for _ in 0..stock::MAX_ATTEMPTS {
            let mut conn = self.pool.acquire().await?;
            let Some((cur_stock, cur_sales, _price)) =
                Self::read_stock_tx(&mut conn, id).await?
            else {
                return Err(RepoError::NotFound(format!("Sku {} not found", id)));
            };
            if Self::compare_and_swap_stock(&mut conn, id, cur_stock, cur_stock + quantity, cur_sales)
                .await?
            {
                drop(conn);
                return self
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Sku {} not found", id)));
            }
        }
        Err(RepoError::Database(format!(
            "restock contention exhausted for sku {}",
            id
        )))
    }
}
