//! 支付对账集成测试
//!
//! 有界轮询、状态流转、取消语义。库存在下单时已扣减，
//! 对账不碰库存。

mod common;

use common::*;
use shared::models::{OrderStatus, PayMethod};
use std::sync::Arc;
use std::time::Duration;
use store_server::payment::{
    MockGateway, PaymentReconciler, ReconcileConfig, ReconcileOutcome,
};
use tokio_util::sync::CancellationToken;

const USER: i64 = 7;
const ADDR: i64 = 1;

async fn committed_order(ctx: &TestCtx) -> String {
    seed_sku(&ctx.pool, 1, 1000, 5).await;
    seed_address(&ctx.pool, ADDR, USER).await;
    ctx.cart.add(USER, 1, 1).await.unwrap();
    ctx.engine
        .commit(USER, ADDR, PayMethod::Gateway, &[1])
        .await
        .unwrap()
        .order_id
}

fn fast_config(max_attempts: u32) -> ReconcileConfig {
    ReconcileConfig {
        poll_interval: Duration::from_millis(10),
        max_attempts,
    }
}

/// 预算耗尽：返回 Pending，订单保持未支付
#[tokio::test]
async fn budget_exhaustion_leaves_order_unpaid() {
    let ctx = setup().await;
    let order_id = committed_order(&ctx).await;

    let gateway = Arc::new(MockGateway::always_pending());
    let reconciler = PaymentReconciler::new(
        gateway.clone(),
        ctx.orders.clone(),
        fast_config(5),
        CancellationToken::new(),
    );

    let outcome = reconciler.poll_until_paid(&order_id).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Pending);
    assert_eq!(gateway.query_count(), 5);

    let order = ctx.orders.find_by_id(&order_id).await.unwrap();
    assert_eq!(order.order_status, OrderStatus::Unpaid as i32 as i64);
    assert_eq!(order.trade_no, None);
    // 库存不受对账影响
    assert_eq!(sku_stock_sales(&ctx.pool, 1).await, (4, 1));
}

/// 中途确认：状态推进到待评价并记录交易号
#[tokio::test]
async fn confirmation_midway_marks_paid() {
    let ctx = setup().await;
    let order_id = committed_order(&ctx).await;

    let gateway = Arc::new(MockGateway::succeed_after(3));
    let reconciler = PaymentReconciler::new(
        gateway.clone(),
        ctx.orders.clone(),
        fast_config(10),
        CancellationToken::new(),
    );

    let outcome = reconciler.poll_until_paid(&order_id).await.unwrap();
    let ReconcileOutcome::Paid { trade_no } = outcome else {
        panic!("expected Paid, got {outcome:?}");
    };
    assert_eq!(trade_no, format!("mock-trade-{order_id}"));
    assert_eq!(gateway.query_count(), 3);

    let order = ctx.orders.find_by_id(&order_id).await.unwrap();
    assert_eq!(order.order_status, OrderStatus::AwaitingComment as i32 as i64);
    assert_eq!(order.trade_no.as_deref(), Some(trade_no.as_str()));
}

/// 已取消的令牌立即结束轮询，不触网关
#[tokio::test]
async fn cancellation_ends_loop_without_queries() {
    let ctx = setup().await;
    let order_id = committed_order(&ctx).await;

    let gateway = Arc::new(MockGateway::always_pending());
    let token = CancellationToken::new();
    token.cancel();
    let reconciler = PaymentReconciler::new(
        gateway.clone(),
        ctx.orders.clone(),
        fast_config(100),
        token,
    );

    let outcome = reconciler.poll_until_paid(&order_id).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Cancelled);
    assert_eq!(gateway.query_count(), 0);

    let order = ctx.orders.find_by_id(&order_id).await.unwrap();
    assert_eq!(order.order_status, OrderStatus::Unpaid as i32 as i64);
}

/// 已对账订单的快速路径：不再查询网关
#[tokio::test]
async fn already_paid_order_short_circuits() {
    let ctx = setup().await;
    let order_id = committed_order(&ctx).await;
    assert!(ctx.orders.mark_paid(&order_id, "earlier-trade").await.unwrap());

    let gateway = Arc::new(MockGateway::always_pending());
    let reconciler = PaymentReconciler::new(
        gateway.clone(),
        ctx.orders.clone(),
        fast_config(100),
        CancellationToken::new(),
    );

    let outcome = reconciler.poll_until_paid(&order_id).await.unwrap();
    assert_eq!(
        outcome,
        ReconcileOutcome::Paid {
            trade_no: "earlier-trade".to_string()
        }
    );
    assert_eq!(gateway.query_count(), 0);
}
