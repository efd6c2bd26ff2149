//! Commit engine error taxonomy
//!
//! Business-rule failures (insufficient stock, missing cart entry) and
//! contention exhaustion abort the in-flight transaction cleanly and are
//! reported as resubmittable errors, distinct from system faults.

use crate::cart::CartError;
use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("no skus selected")]
    EmptySelection,

    #[error("address {0} does not belong to the user")]
    InvalidAddress(i64),

    #[error("sku {0} not found")]
    SkuNotFound(i64),

    #[error("sku {0} is not in the cart")]
    CartEntryMissing(i64),

    #[error("insufficient stock for sku {sku_id}: requested {requested}, available {available}")]
    InsufficientStock {
        sku_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("stock update for sku {0} lost the race {1} times")]
    ContentionExhausted(i64, u32),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CommitError> for AppError {
    fn from(e: CommitError) -> Self {
        match e {
            CommitError::EmptySelection => {
                AppError::IncompleteData("no skus selected".to_string())
            }
            CommitError::InvalidAddress(id) => {
                AppError::InvalidAddress(format!("Address {} is invalid", id))
            }
            CommitError::SkuNotFound(id) => {
                AppError::SkuNotFound(format!("Sku {} not found", id))
            }
            CommitError::CartEntryMissing(id) => {
                AppError::CartEntryMissing(format!("Sku {} is not in the cart", id))
            }
            CommitError::InsufficientStock { sku_id, .. } => {
                AppError::InsufficientStock(format!("Insufficient stock for sku {}", sku_id))
            }
            CommitError::ContentionExhausted(sku_id, _) => AppError::ContentionExhausted(format!(
                "Sku {} is contended, please resubmit",
                sku_id
            )),
            CommitError::Cart(e) => e.into(),
            CommitError::Repo(e) => AppError::database(e.to_string()),
        }
    }
}
