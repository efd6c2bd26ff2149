//! HTTP payment gateway client
//!
//! Talks JSON to the provider's endpoint pair. Trade status strings
//! follow the provider's wire vocabulary (`TRADE_SUCCESS`,
//! `WAIT_BUYER_PAY`, `TRADE_CLOSED`).

use super::{GatewayError, PaymentGateway, TradeQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::TradeStatus;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
}

#[derive(Debug, Serialize)]
struct PagePayRequest<'a> {
    app_id: &'a str,
    out_trade_no: &'a str,
    total_amount_cents: i64,
    subject: &'a str,
}

#[derive(Debug, Deserialize)]
struct PagePayResponse {
    pay_url: String,
}

#[derive(Debug, Serialize)]
struct TradeQueryRequest<'a> {
    app_id: &'a str,
    out_trade_no: &'a str,
}

#[derive(Debug, Deserialize)]
struct TradeQueryResponse {
    trade_status: String,
    #[serde(default)]
    trade_no: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            app_id: app_id.into(),
        }
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, GatewayError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(GatewayError::Protocol(format!(
                "gateway returned {}",
                response.status()
            )));
        }
        response
            .json::<R>()
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn create_page_pay(
        &self,
        order_id: &str,
        amount_cents: i64,
        subject: &str,
    ) -> Result<String, GatewayError> {
        let response: PagePayResponse = self
            .post(
                "/trade/page_pay",
                &PagePayRequest {
                    app_id: &self.app_id,
                    out_trade_no: order_id,
                    total_amount_cents: amount_cents,
                    subject,
                },
            )
            .await?;
        Ok(response.pay_url)
    }

    async fn query_trade(&self, order_id: &str) -> Result<TradeQuery, GatewayError> {
        let response: TradeQueryResponse = self
            .post(
                "/trade/query",
                &TradeQueryRequest {
                    app_id: &self.app_id,
                    out_trade_no: order_id,
                },
            )
            .await?;
        let status = match response.trade_status.as_str() {
            "TRADE_SUCCESS" | "TRADE_FINISHED" => TradeStatus::Success,
            "WAIT_BUYER_PAY" => TradeStatus::Pending,
            "TRADE_CLOSED" => TradeStatus::Closed,
            _ => TradeStatus::Unknown,
        };
        Ok(TradeQuery {
            status,
            trade_no: response.trade_no,
        })
    }
}
