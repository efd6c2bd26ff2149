//! Order API Handlers
//!
//! Validation failures reject before any transaction opens; commit-time
//! business failures surface as distinct result codes so the client can
//! decide whether resubmission makes sense.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::time::Duration;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::payment::{PaymentReconciler, ReconcileConfig, ReconcileOutcome};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{
    CheckResult, CommentEntry, CommitResult, OrderPage, OrderPreview, OrderStatus, OrderView,
    PayMethod, PayResult, TradeStatus,
};

/// Body of the place-order preview
#[derive(Debug, Deserialize)]
pub struct PlaceRequest {
    #[serde(default)]
    pub sku_ids: Vec<i64>,
}

/// Body of the order commit: sku ids arrive comma-joined from the
/// place-order form
#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub addr_id: Option<i64>,
    pub pay_method: Option<i64>,
    pub sku_ids: Option<String>,
}

/// Body of pay / check
#[derive(Debug, Deserialize)]
pub struct OrderIdRequest {
    pub order_id: Option<String>,
}

/// Body of comment submission
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comments: Vec<CommentEntry>,
}

/// Query params for order history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// POST /api/orders/place - 提交订单页面数据（确认商品、地址、运费）
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PlaceRequest>,
) -> AppResult<Json<AppResponse<OrderPreview>>> {
    let preview = state.engine.place(user.id, &payload.sku_ids).await?;
    Ok(ok(preview))
}

/// POST /api/orders/commit - 创建订单（核心事务）
pub async fn commit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CommitRequest>,
) -> AppResult<Json<AppResponse<CommitResult>>> {
    let addr_id = payload
        .addr_id
        .ok_or_else(|| AppError::incomplete("addr_id is required"))?;
    let pay_method = payload
        .pay_method
        .ok_or_else(|| AppError::incomplete("pay_method is required"))?;
    let sku_ids = payload
        .sku_ids
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::incomplete("sku_ids is required"))?;

    let pay_method = i32::try_from(pay_method)
        .ok()
        .and_then(|v| PayMethod::try_from(v).ok())
        .ok_or_else(|| AppError::InvalidPayMethod(format!("pay method {} is invalid", pay_method)))?;

    let sku_ids = parse_sku_ids(sku_ids)?;

    let result = state
        .engine
        .commit(user.id, addr_id, pay_method, &sku_ids)
        .await?;
    Ok(ok(result))
}

/// GET /api/orders?page= - 用户订单历史（分页）
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<AppResponse<OrderPage>>> {
    let page = state
        .order_queries
        .history_page(user.id, query.page)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(ok(page))
}

/// GET /api/orders/:order_id - 订单详情
pub async fn detail(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
) -> AppResult<Json<AppResponse<OrderView>>> {
    let view = state
        .order_queries
        .order_detail(&order_id, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::OrderNotFound(format!("Order {} not found", order_id)))?;
    Ok(ok(view))
}

/// POST /api/orders/pay - 生成网关支付跳转地址
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderIdRequest>,
) -> AppResult<Json<AppResponse<PayResult>>> {
    let order_id = payload
        .order_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::incomplete("order_id is required"))?;

    let order = state
        .orders
        .find_for_user(order_id, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::OrderNotFound(format!("Order {} not found", order_id)))?;

    if order.order_status != OrderStatus::Unpaid as i32 as i64 {
        return Err(AppError::invalid("order is not awaiting payment"));
    }

    // 实付款 = 商品总价 + 运费
    let amount_cents = order.total_price_cents + order.transit_price_cents;
    let subject = format!("storefront order {}", order_id);
    let pay_url = state
        .gateway
        .create_page_pay(order_id, amount_cents, &subject)
        .await
        .map_err(|e| AppError::PaymentUnavailable(e.to_string()))?;

    Ok(ok(PayResult { pay_url }))
}

/// POST /api/orders/check - 轮询支付结果
///
/// 有界轮询：固定间隔 × 固定次数；超出预算返回 E5001，订单状态不变，
/// 可稍后重查。
pub async fn check(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderIdRequest>,
) -> AppResult<Json<AppResponse<CheckResult>>> {
    let order_id = payload
        .order_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::incomplete("order_id is required"))?;

    // Ownership check before any gateway traffic
    state
        .orders
        .find_for_user(order_id, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::OrderNotFound(format!("Order {} not found", order_id)))?;

    let reconciler = PaymentReconciler::new(
        state.gateway.clone(),
        state.orders.clone(),
        ReconcileConfig {
            poll_interval: Duration::from_millis(state.config.pay_poll_interval_ms),
            max_attempts: state.config.pay_poll_max_attempts,
        },
        state.shutdown.child_token(),
    );

    match reconciler
        .poll_until_paid(order_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
    {
        ReconcileOutcome::Paid { trade_no } => Ok(ok(CheckResult {
            status: TradeStatus::Success,
            trade_no: Some(trade_no),
        })),
        ReconcileOutcome::Pending => Err(AppError::PaymentPending(
            "payment not confirmed, try again later".to_string(),
        )),
        ReconcileOutcome::Cancelled => Err(AppError::PaymentPending(
            "payment check interrupted".to_string(),
        )),
    }
}

/// POST /api/orders/:order_id/comment - 提交评论并完成订单
pub async fn comment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> AppResult<Json<AppResponse<OrderView>>> {
    state
        .orders
        .find_for_user(&order_id, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::OrderNotFound(format!("Order {} not found", order_id)))?;

    // Pairs that don't match a line are skipped, not an error
    for entry in &payload.comments {
        let written = state
            .orders
            .set_line_comment(&order_id, entry.sku_id, &entry.content)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        if !written {
            tracing::debug!(order_id = %order_id, sku_id = entry.sku_id, "comment for unknown line skipped");
        }
    }

    let completed = state
        .orders
        .mark_completed(&order_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !completed {
        return Err(AppError::invalid("order is not awaiting comment"));
    }

    let view = state
        .order_queries
        .order_detail(&order_id, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::OrderNotFound(format!("Order {} not found", order_id)))?;
    Ok(ok(view))
}

fn parse_sku_ids(joined: &str) -> Result<Vec<i64>, AppError> {
    joined
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim()
                .parse::<i64>()
                .map_err(|_| AppError::validation(format!("invalid sku id: {s}")))
        })
        .collect()
}
