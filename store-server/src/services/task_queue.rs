//! Outbound task queue
//!
//! Fire-and-forget work (catalog invalidation, index regeneration) is
//! enqueued onto an unbounded channel and drained by a background
//! worker. The enqueueing side never blocks and never fails the caller:
//! losing a display-refresh task is a staleness inconvenience, not a
//! correctness violation.

use crate::db::repository::SkuRepository;
use crate::services::catalog_cache::{CatalogCache, INDEX_KEY};
use shared::models::SkuView;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Tasks the core may hand off
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundTask {
    /// Catalog display changed (sell-out during commit, restock);
    /// cached views for it must be dropped
    CatalogChanged { sku_id: i64 },
    /// Eagerly rebuild the cached index view
    RegenerateIndex,
}

/// Cloneable enqueue handle
#[derive(Clone, Debug)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<OutboundTask>,
}

impl TaskQueue {
    /// Create the queue; the receiver half goes to [`run_worker`]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue without blocking; a closed channel is logged and tolerated
    pub fn enqueue(&self, task: OutboundTask) {
        if let Err(e) = self.tx.send(task) {
            tracing::warn!(task = ?e.0, "outbound task queue closed, task dropped");
        }
    }
}

/// Drain the queue until cancellation
///
/// Registered as a `Worker` background task at startup.
pub async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<OutboundTask>,
    cache: CatalogCache,
    skus: SkuRepository,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("outbound task worker shutting down");
                break;
            }
            task = rx.recv() => {
                let Some(task) = task else { break };
                handle_task(task, &cache, &skus).await;
            }
        }
    }
}

async fn handle_task(task: OutboundTask, cache: &CatalogCache, skus: &SkuRepository) {
    match task {
        OutboundTask::CatalogChanged { sku_id } => {
            tracing::info!(sku_id, "catalog changed, invalidating index view");
            cache.invalidate(INDEX_KEY).await;
        }
        OutboundTask::RegenerateIndex => match skus.find_active().await {
            Ok(rows) => {
                let views: Vec<SkuView> = rows.into_iter().map(Into::into).collect();
                match serde_json::to_value(&views) {
                    Ok(value) => cache.put(INDEX_KEY, value).await,
                    Err(e) => tracing::warn!(error = %e, "failed to serialize index view"),
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to rebuild index view"),
        },
    }
}
