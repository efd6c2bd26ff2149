//! Address Repository
//!
//! Read-only: address management belongs to the account service. The
//! commit path only needs ownership validation and the place-order page
//! needs the saved list.

use super::RepoResult;
use crate::db::models::Address;
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct AddressRepository {
    pool: SqlitePool,
}

impl AddressRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All addresses saved by the user, default first
    pub async fn find_by_user(&self, user_id: i64) -> RepoResult<Vec<Address>> {
        let addrs = sqlx::query_as::<_, Address>(
            "SELECT * FROM address WHERE user_id = ? ORDER BY is_default DESC, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(addrs)
    }

    /// One address, only if it belongs to the user
    pub async fn find_for_user(&self, addr_id: i64, user_id: i64) -> RepoResult<Option<Address>> {
        let addr = sqlx::query_as::<_, Address>(
            "SELECT * FROM address WHERE id = ? AND user_id = ?",
        )
        .bind(addr_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(addr)
    }
}
