//! redb-based storage for carts and browse history
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `cart` | `(user_id, sku_id)` | `u32` | Per-user sku → quantity hash |
//! | `history` | `user_id` | `Vec<i64>` (JSON) | Recently viewed skus (≤5) |
//!
//! Single-key last-write-wins semantics are sufficient here: only the
//! owning user mutates their own keys. All cross-user consistency (stock)
//! is enforced elsewhere.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Cart hash: key = (user_id, sku_id), value = quantity
const CART_TABLE: TableDefinition<(i64, i64), u32> = TableDefinition::new("cart");

/// Browse history: key = user_id, value = JSON-serialized Vec<sku_id>
const HISTORY_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("history");

/// Most-recent sku ids kept per user
const HISTORY_LIMIT: usize = 5;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Cart KV storage — shared via `Arc`, cheap to clone
#[derive(Debug, Clone)]
pub struct CartStorage {
    db: Arc<Database>,
}

impl CartStorage {
    /// Open (or create) the cart database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = Database::create(path)?;
        // Ensure tables exist so first reads don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
            let _ = write_txn.open_table(HISTORY_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    // ========== Cart hash ==========

    /// Current quantity for (user, sku), if present
    pub fn quantity(&self, user_id: i64, sku_id: i64) -> Result<Option<u32>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        Ok(table.get((user_id, sku_id))?.map(|v| v.value()))
    }

    /// Set the absolute quantity for (user, sku)
    pub fn set_quantity(
        &self,
        user_id: i64,
        sku_id: i64,
        quantity: u32,
    ) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            table.insert((user_id, sku_id), quantity)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete one entry; absent entries are not an error
    pub fn remove(&self, user_id: i64, sku_id: i64) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            table.remove((user_id, sku_id))?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete several entries in one transaction (post-commit eviction)
    pub fn remove_many(&self, user_id: i64, sku_ids: &[i64]) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            for &sku_id in sku_ids {
                table.remove((user_id, sku_id))?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Full sku → quantity mapping for one user
    pub fn entries(&self, user_id: i64) -> Result<Vec<(i64, u32)>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        let mut out = Vec::new();
        for item in table.range((user_id, i64::MIN)..=(user_id, i64::MAX))? {
            let (key, value) = item?;
            out.push((key.value().1, value.value()));
        }
        Ok(out)
    }

    /// Number of distinct sku entries for one user
    pub fn distinct_count(&self, user_id: i64) -> Result<u64, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        let mut count = 0u64;
        for item in table.range((user_id, i64::MIN)..=(user_id, i64::MAX))? {
            item?;
            count += 1;
        }
        Ok(count)
    }

    // ========== Browse history ==========

    /// Record a sku view: de-duplicated, most-recent-first, truncated
    pub fn push_history(&self, user_id: i64, sku_id: i64) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(HISTORY_TABLE)?;
            let mut history: Vec<i64> = match table.get(user_id)? {
                Some(bytes) => serde_json::from_slice(bytes.value())?,
                None => Vec::new(),
            };
            history.retain(|&id| id != sku_id);
            history.insert(0, sku_id);
            history.truncate(HISTORY_LIMIT);
            let bytes = serde_json::to_vec(&history)?;
            table.insert(user_id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Recently viewed sku ids, most recent first
    pub fn recent_history(&self, user_id: i64) -> Result<Vec<i64>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(HISTORY_TABLE)?;
        match table.get(user_id)? {
            Some(bytes) => Ok(serde_json::from_slice(bytes.value())?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> (tempfile::TempDir, CartStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = CartStorage::open(dir.path().join("cart.redb")).unwrap();
        (dir, storage)
    }

    #[test]
    fn set_and_read_back() {
        let (_dir, storage) = scratch();
        storage.set_quantity(1, 100, 3).unwrap();
        assert_eq!(storage.quantity(1, 100).unwrap(), Some(3));
        assert_eq!(storage.quantity(1, 101).unwrap(), None);
    }

    #[test]
    fn entries_are_scoped_per_user() {
        let (_dir, storage) = scratch();
        storage.set_quantity(1, 100, 1).unwrap();
        storage.set_quantity(1, 101, 2).unwrap();
        storage.set_quantity(2, 100, 9).unwrap();

        let entries = storage.entries(1).unwrap();
        assert_eq!(entries, vec![(100, 1), (101, 2)]);
        assert_eq!(storage.distinct_count(1).unwrap(), 2);
        assert_eq!(storage.distinct_count(2).unwrap(), 1);
        assert_eq!(storage.distinct_count(3).unwrap(), 0);
    }

    #[test]
    fn remove_is_idempotent() {
        let (_dir, storage) = scratch();
        storage.set_quantity(1, 100, 1).unwrap();
        storage.remove(1, 100).unwrap();
        // Second removal of an absent key succeeds
        storage.remove(1, 100).unwrap();
        assert_eq!(storage.distinct_count(1).unwrap(), 0);
    }

    #[test]
    fn history_dedups_and_truncates() {
        let (_dir, storage) = scratch();
        for sku in [1, 2, 3, 4, 5, 6, 3] {
            storage.push_history(7, sku).unwrap();
        }
        // 3 moved back to the front, 1 fell off the end
        assert_eq!(storage.recent_history(7).unwrap(), vec![3, 6, 5, 4, 2]);
    }
}
