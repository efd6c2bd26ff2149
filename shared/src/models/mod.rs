//! Data models
//!
//! View DTOs and domain enums shared between store-server and frontend
//! (via API). Row types live server-side; everything here is what the
//! wire carries. All IDs are `i64`, all money is integer cents.

pub mod cart;
pub mod order;
pub mod sku;

// Re-exports
pub use cart::*;
pub use order::*;
pub use sku::*;
