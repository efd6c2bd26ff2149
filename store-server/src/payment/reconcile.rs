//! Payment Reconciliation Loop
//!
//! Polls the gateway for one order's trade outcome in a bounded loop:
//! fixed interval, fixed attempt budget, cancellable. A confirmed trade
//! transitions the order `Unpaid → AwaitingComment` and records the
//! provider's transaction id; an exhausted budget reports pending and
//! leaves the order eligible for a later re-check.

use crate::db::repository::{OrderRepository, RepoError};
use crate::payment::PaymentGateway;
use shared::models::{OrderStatus, TradeStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: 120,
        }
    }
}

/// Terminal result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Gateway confirmed; order moved to AwaitingComment
    Paid { trade_no: String },
    /// Attempt budget exhausted without confirmation; order untouched
    Pending,
    /// Cancelled by shutdown or caller; order untouched
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct PaymentReconciler {
    gateway: Arc<dyn PaymentGateway>,
    orders: OrderRepository,
    config: ReconcileConfig,
    shutdown: CancellationToken,
}

impl PaymentReconciler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        orders: OrderRepository,
        config: ReconcileConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            gateway,
            orders,
            config,
            shutdown,
        }
    }

    /// Poll until the gateway confirms, the budget runs out, or the loop
    /// is cancelled
    ///
    /// Gateway transport failures count as failed attempts and never
    /// mutate order state. An order that already left `Unpaid` (a
    /// concurrent check, a provider callback) is treated as paid.
    pub async fn poll_until_paid(&self, order_id: &str) -> Result<ReconcileOutcome, RepoError> {
        // Fast path: someone else already reconciled this order
        let order = self.orders.find_by_id(order_id).await?;
        if order.order_status != OrderStatus::Unpaid as i32 as i64 {
            let trade_no = order.trade_no.unwrap_or_default();
            return Ok(ReconcileOutcome::Paid { trade_no });
        }

        for attempt in 1..=self.config.max_attempts {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!(order_id, attempt, "payment reconciliation cancelled");
                    return Ok(ReconcileOutcome::Cancelled);
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            match self.gateway.query_trade(order_id).await {
                Ok(query) if query.status == TradeStatus::Success => {
                    let trade_no = query.trade_no.unwrap_or_default();
                    let transitioned = self.orders.mark_paid(order_id, &trade_no).await?;
                    if !transitioned {
                        // Lost a benign race with another reconciler run
                        tracing::debug!(order_id, "order already reconciled");
                    }
                    tracing::info!(order_id, trade_no = %trade_no, attempt, "payment confirmed");
                    return Ok(ReconcileOutcome::Paid { trade_no });
                }
                Ok(query) => {
                    tracing::debug!(order_id, attempt, status = ?query.status, "trade not confirmed yet");
                }
                Err(e) => {
                    tracing::warn!(order_id, attempt, error = %e, "gateway query failed");
                }
            }
        }

        tracing::info!(
            order_id,
            attempts = self.config.max_attempts,
            "payment reconciliation budget exhausted"
        );
        Ok(ReconcileOutcome::Pending)
    }
}
