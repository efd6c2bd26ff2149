//! Shared types for the storefront
//!
//! Common types used by the server and its clients: domain enums for
//! orders and payments, view DTOs rendered by the API, and id/time
//! utilities.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{OrderStatus, PayMethod, TradeStatus};
