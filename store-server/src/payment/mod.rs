//! Payment gateway seam and reconciliation
//!
//! The provider is consumed only through the [`PaymentGateway`] trait;
//! signature/crypto internals live on the provider's side of the HTTP
//! boundary. Stock is already committed at order placement, so nothing
//! here touches inventory.

pub mod http;
pub mod mock;
pub mod reconcile;

pub use http::HttpGateway;
pub use mock::MockGateway;
pub use reconcile::{PaymentReconciler, ReconcileConfig, ReconcileOutcome};

use async_trait::async_trait;
use shared::models::TradeStatus;
use thiserror::Error;

/// One trade-query answer from the gateway
#[derive(Debug, Clone)]
pub struct TradeQuery {
    pub status: TradeStatus,
    /// Provider-side transaction id, present once the trade exists
    pub trade_no: Option<String>,
}

/// Gateway errors — all of them leave order and stock state untouched
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway protocol error: {0}")]
    Protocol(String),
}

/// Abstract payment provider
#[async_trait]
pub trait PaymentGateway: Send + Sync + std::fmt::Debug {
    /// Build the redirect URL that takes the buyer to the provider's
    /// payment page for the given merchant order
    async fn create_page_pay(
        &self,
        order_id: &str,
        amount_cents: i64,
        subject: &str,
    ) -> Result<String, GatewayError>;

    /// Query the outcome of one trade by merchant order id
    async fn query_trade(&self, order_id: &str) -> Result<TradeQuery, GatewayError>;
}
