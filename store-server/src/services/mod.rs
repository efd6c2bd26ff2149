//! Background services: outbound task queue and catalog cache

pub mod catalog_cache;
pub mod task_queue;

pub use catalog_cache::CatalogCache;
pub use task_queue::{OutboundTask, TaskQueue};
