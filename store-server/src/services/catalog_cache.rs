//! Catalog view cache with key-based invalidation
//!
//! Cache-aside: read paths consult the cache and repopulate on miss;
//! catalog-changed events (sell-out, restock) invalidate by key through
//! the outbound task worker, decoupled from the write path.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache key for the storefront index view
pub const INDEX_KEY: &str = "index";

/// 目录视图缓存
#[derive(Debug, Clone)]
pub struct CatalogCache {
    inner: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Cached view, if present
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let inner = self.inner.read().await;
        inner.get(key).cloned()
    }

    /// Store a freshly built view
    pub async fn put(&self, key: impl Into<String>, value: serde_json::Value) {
        let mut inner = self.inner.write().await;
        inner.insert(key.into(), value);
    }

    /// Drop one key; the next read rebuilds it
    pub async fn invalidate(&self, key: &str) {
        let mut inner = self.inner.write().await;
        if inner.remove(key).is_some() {
            tracing::debug!(key, "catalog cache invalidated");
        }
    }

    /// Drop everything
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.clear();
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalidate_removes_only_the_key() {
        let cache = CatalogCache::new();
        cache.put("index", serde_json::json!({"v": 1})).await;
        cache.put("promos", serde_json::json!({"v": 2})).await;

        cache.invalidate("index").await;

        assert!(cache.get("index").await.is_none());
        assert!(cache.get("promos").await.is_some());
    }
}
