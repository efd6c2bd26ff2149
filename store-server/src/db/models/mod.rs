//! Database row models
//!
//! Server-side row types mapped with `sqlx::FromRow`. Client-facing view
//! DTOs live in the `shared` crate; projections convert between the two.

pub mod address;
pub mod order;
pub mod sku;

// Re-exports
pub use address::Address;
pub use order::{OrderInfo, OrderLine};
pub use sku::Sku;
