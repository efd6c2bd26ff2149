//! Cart Store
//!
//! Session-scoped shopping cart: a per-user sku → quantity hash backed by
//! redb, validated against the catalog at write time. Stock checks here
//! are soft — the commit engine re-validates under its transaction — but
//! they keep carts honest for display.

pub mod storage;

pub use storage::{CartStorage, StorageError};

use crate::db::repository::{RepoError, SkuRepository};
use crate::utils::AppError;
use shared::models::{CartLineView, CartView, SkuView};
use thiserror::Error;

/// Cart errors
#[derive(Debug, Error)]
pub enum CartError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("sku {0} not found")]
    SkuNotFound(i64),

    #[error("insufficient stock for sku {sku_id}: requested {requested}, available {available}")]
    InsufficientStock {
        sku_id: i64,
        requested: i64,
        available: i64,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::InvalidQuantity(q) => {
                AppError::InvalidQuantity(format!("quantity {} is not a positive integer", q))
            }
            CartError::SkuNotFound(id) => AppError::SkuNotFound(format!("Sku {} not found", id)),
            CartError::InsufficientStock { sku_id, .. } => {
                AppError::InsufficientStock(format!("Insufficient stock for sku {}", sku_id))
            }
            CartError::Storage(e) => AppError::database(e.to_string()),
            CartError::Repo(e) => AppError::database(e.to_string()),
        }
    }
}

/// Cart service — storage plus catalog validation
#[derive(Clone, Debug)]
pub struct CartStore {
    storage: CartStorage,
    skus: SkuRepository,
}

impl CartStore {
    pub fn new(storage: CartStorage, skus: SkuRepository) -> Self {
        Self { storage, skus }
    }

    /// Add to the cart: quantities for an existing entry sum
    ///
    /// Returns the distinct-item count after the write.
    pub async fn add(&self, user_id: i64, sku_id: i64, quantity: i64) -> Result<u64, CartError> {
        let quantity = validate_quantity(quantity)?;
        let (stock, _price) = self
            .skus
            .get_stock(sku_id)
            .await?
            .ok_or(CartError::SkuNotFound(sku_id))?;

        let existing = self.storage.quantity(user_id, sku_id)?.unwrap_or(0);
        let total = i64::from(existing) + i64::from(quantity);
        if total > stock {
            return Err(CartError::InsufficientStock {
                sku_id,
                requested: total,
                available: stock,
            });
        }

        self.storage.set_quantity(user_id, sku_id, total as u32)?;
        Ok(self.storage.distinct_count(user_id)?)
    }

    /// Set the absolute quantity for an entry
    ///
    /// Idempotent set semantics: safe for duplicate delivery.
    pub async fn update(&self, user_id: i64, sku_id: i64, quantity: i64) -> Result<u64, CartError> {
        let quantity = validate_quantity(quantity)?;
        let (stock, _price) = self
            .skus
            .get_stock(sku_id)
            .await?
            .ok_or(CartError::SkuNotFound(sku_id))?;

        if i64::from(quantity) > stock {
            return Err(CartError::InsufficientStock {
                sku_id,
                requested: i64::from(quantity),
                available: stock,
            });
        }

        self.storage.set_quantity(user_id, sku_id, quantity)?;
        Ok(self.storage.distinct_count(user_id)?)
    }

    /// Remove an entry; removing an absent entry succeeds unchanged
    pub fn remove(&self, user_id: i64, sku_id: i64) -> Result<u64, CartError> {
        self.storage.remove(user_id, sku_id)?;
        Ok(self.storage.distinct_count(user_id)?)
    }

    /// Distinct-entry count for the cart badge
    pub fn count(&self, user_id: i64) -> Result<u64, CartError> {
        Ok(self.storage.distinct_count(user_id)?)
    }

    /// Quantity of one entry, if present (commit engine read path)
    pub fn quantity(&self, user_id: i64, sku_id: i64) -> Result<Option<u32>, CartError> {
        Ok(self.storage.quantity(user_id, sku_id)?)
    }

    /// Evict committed entries; callers may tolerate failure
    pub fn remove_many(&self, user_id: i64, sku_ids: &[i64]) -> Result<(), CartError> {
        Ok(self.storage.remove_many(user_id, sku_ids)?)
    }

    /// Full cart projection for display: lines joined with their skus,
    /// subtotals and totals computed here, never attached to entities
    pub async fn list(&self, user_id: i64) -> Result<CartView, CartError> {
        let entries = self.storage.entries(user_id)?;
        let mut lines = Vec::with_capacity(entries.len());
        let mut total_count = 0i64;
        let mut total_price_cents = 0i64;

        for (sku_id, quantity) in entries {
            let Some(sku) = self.skus.find_by_id(sku_id).await? else {
                // Sku retired after it was carted; leave the entry out of
                // the view, the next update will overwrite it
                tracing::warn!(sku_id, user_id, "cart entry references missing sku");
                continue;
            };
            let quantity = i64::from(quantity);
            let subtotal = sku.price_cents * quantity;
            total_count += quantity;
            total_price_cents += subtotal;
            lines.push(CartLineView {
                sku_id: sku.id,
                name: sku.name,
                unit: sku.unit,
                price_cents: sku.price_cents,
                quantity,
                subtotal_cents: subtotal,
                stock: sku.stock,
            });
        }

        Ok(CartView {
            lines,
            total_count,
            total_price_cents,
        })
    }

    // ========== Browse history ==========

    /// Record a sku detail view
    pub fn push_history(&self, user_id: i64, sku_id: i64) -> Result<(), CartError> {
        Ok(self.storage.push_history(user_id, sku_id)?)
    }

    /// Recently viewed skus, most recent first, joined with the catalog
    pub async fn recent_history(&self, user_id: i64) -> Result<Vec<SkuView>, CartError> {
        let ids = self.storage.recent_history(user_id)?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(sku) = self.skus.find_by_id(id).await? {
                out.push(sku.into());
            }
        }
        Ok(out)
    }
}

fn validate_quantity(quantity: i64) -> Result<u32, CartError> {
    if quantity < 1 {
        return Err(CartError::InvalidQuantity(quantity));
    }
    u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))
}
