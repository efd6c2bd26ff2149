//! In-process mock gateway
//!
//! Used by tests and by local development when no gateway URL is
//! configured. Scripted: confirms after a fixed number of queries, or
//! never.

use super::{GatewayError, PaymentGateway, TradeQuery};
use async_trait::async_trait;
use shared::models::TradeStatus;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
pub struct MockGateway {
    /// Queries remaining before the trade confirms; `u32::MAX` = never
    confirm_after: AtomicU32,
    queries: AtomicU32,
}

impl MockGateway {
    /// Confirm the trade on the n-th query (1-based)
    pub fn succeed_after(n: u32) -> Self {
        Self {
            confirm_after: AtomicU32::new(n),
            queries: AtomicU32::new(0),
        }
    }

    /// Never confirm
    pub fn always_pending() -> Self {
        Self {
            confirm_after: AtomicU32::new(u32::MAX),
            queries: AtomicU32::new(0),
        }
    }

    /// Number of trade queries observed so far
    pub fn query_count(&self) -> u32 {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_page_pay(
        &self,
        order_id: &str,
        _amount_cents: i64,
        _subject: &str,
    ) -> Result<String, GatewayError> {
        Ok(format!("mock://pay/{order_id}"))
    }

    async fn query_trade(&self, order_id: &str) -> Result<TradeQuery, GatewayError> {
        let seen = self.queries.fetch_add(1, Ordering::SeqCst) + 1;
        let target = self.confirm_after.load(Ordering::SeqCst);
        if target != u32::MAX && seen >= target {
            Ok(TradeQuery {
                status: TradeStatus::Success,
                trade_no: Some(format!("mock-trade-{order_id}")),
            })
        } else {
            Ok(TradeQuery {
                status: TradeStatus::Pending,
                trade_no: None,
            })
        }
    }
}
