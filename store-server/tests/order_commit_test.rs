//! 订单提交引擎集成测试
//!
//! 覆盖：事务原子性、库存乐观并发、价格定格、购物车清理。

mod common;

use common::*;
use shared::models::{OrderStatus, PayMethod};
use store_server::orders::CommitError;

const USER: i64 = 7;
const ADDR: i64 = 1;

/// 基准场景：cart {sku1: 2, sku2: 1}，sku1 库存 5 单价 10 元，
/// sku2 库存 1 单价 20 元
#[tokio::test]
async fn worked_scenario_totals_stock_and_cart() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 1, 1000, 5).await;
    seed_sku(&ctx.pool, 2, 2000, 1).await;
    seed_address(&ctx.pool, ADDR, USER).await;

    ctx.cart.add(USER, 1, 2).await.unwrap();
    ctx.cart.add(USER, 2, 1).await.unwrap();

    let result = ctx
        .engine
        .commit(USER, ADDR, PayMethod::Gateway, &[1, 2])
        .await
        .unwrap();

    let order = ctx
        .orders
        .find_for_user(&result.order_id, USER)
        .await
        .unwrap()
        .expect("order persisted");
    assert_eq!(order.total_price_cents, 4000);
    assert_eq!(order.total_count, 3);
    assert_eq!(order.order_status, OrderStatus::Unpaid as i32 as i64);
    assert_eq!(order.transit_price_cents, TRANSIT_PRICE_CENTS);

    assert_eq!(sku_stock_sales(&ctx.pool, 1).await, (3, 2));
    assert_eq!(sku_stock_sales(&ctx.pool, 2).await, (0, 1));

    let lines = ctx.orders.lines_for_order(&result.order_id).await.unwrap();
    assert_eq!(lines.len(), 2);

    // 购物车中已提交条目被清除
    assert_eq!(ctx.cart.count(USER).unwrap(), 0);
}

/// 库存不足：整单失败，订单表无新行
#[tokio::test]
async fn insufficient_stock_aborts_whole_commit() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 4, 1000, 5).await;
    seed_address(&ctx.pool, ADDR, USER).await;

    ctx.cart.add(USER, 4, 5).await.unwrap();
    // 下单前被别人买走 2 件
    sqlx::query("UPDATE sku SET stock = 3 WHERE id = 4")
        .execute(&ctx.pool)
        .await
        .unwrap();

    let err = ctx
        .engine
        .commit(USER, ADDR, PayMethod::Gateway, &[4])
        .await
        .unwrap_err();
    assert!(matches!(err, CommitError::InsufficientStock { sku_id: 4, .. }));

    assert_eq!(order_count(&ctx.pool).await, 0);
    assert_eq!(line_count(&ctx.pool).await, 0);
    assert_eq!(sku_stock_sales(&ctx.pool, 4).await, (3, 0));
    // 购物车保持原样，可修改后重新提交
    assert_eq!(ctx.cart.count(USER).unwrap(), 1);
}

/// 两个 sku 中第二个失败：第一个 sku 的订单行和库存扣减一并回滚
#[tokio::test]
async fn later_sku_failure_rolls_back_earlier_sku() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 5, 1000, 10).await;
    seed_sku(&ctx.pool, 6, 2000, 10).await;
    seed_address(&ctx.pool, ADDR, USER).await;

    // sku6 在库但不在购物车里：第二次迭代触发 CartEntryMissing
    ctx.cart.add(USER, 5, 1).await.unwrap();

    let err = ctx
        .engine
        .commit(USER, ADDR, PayMethod::Gateway, &[5, 6])
        .await
        .unwrap_err();
    assert!(matches!(err, CommitError::CartEntryMissing(6)));

    // sku5 的扣减不留痕迹
    assert_eq!(order_count(&ctx.pool).await, 0);
    assert_eq!(line_count(&ctx.pool).await, 0);
    assert_eq!(sku_stock_sales(&ctx.pool, 5).await, (10, 0));
}

/// 并发抢最后一件：恰好一单成功
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_commits_for_last_unit() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 3, 1500, 1).await;
    seed_address(&ctx.pool, 1, 101).await;
    seed_address(&ctx.pool, 2, 102).await;

    ctx.cart.add(101, 3, 1).await.unwrap();
    ctx.cart.add(102, 3, 1).await.unwrap();

    let e1 = ctx.engine.clone();
    let e2 = ctx.engine.clone();
    let t1 = tokio::spawn(async move { e1.commit(101, 1, PayMethod::Gateway, &[3]).await });
    let t2 = tokio::spawn(async move { e2.commit(102, 2, PayMethod::Gateway, &[3]).await });

    let r1 = t1.await.unwrap();
    let r2 = t2.await.unwrap();

    let successes = [r1.is_ok(), r2.is_ok()].iter().filter(|&&s| s).count();
    assert_eq!(successes, 1, "exactly one commit must win: {r1:?} / {r2:?}");

    // 输家拿到的是业务错误，不是系统故障
    let loser = if r1.is_err() { r1 } else { r2 };
    assert!(matches!(
        loser.unwrap_err(),
        CommitError::InsufficientStock { .. } | CommitError::ContentionExhausted(..)
    ));

    assert_eq!(sku_stock_sales(&ctx.pool, 3).await, (0, 1));
    assert_eq!(order_count(&ctx.pool).await, 1);
    assert_eq!(line_count(&ctx.pool).await, 1);
}

/// 价格定格：下单后改价不影响历史订单行
#[tokio::test]
async fn unit_price_is_stable_after_sku_price_change() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 8, 1000, 5).await;
    seed_address(&ctx.pool, ADDR, USER).await;

    ctx.cart.add(USER, 8, 2).await.unwrap();
    let result = ctx
        .engine
        .commit(USER, ADDR, PayMethod::CashOnDelivery, &[8])
        .await
        .unwrap();

    sqlx::query("UPDATE sku SET price_cents = 9900 WHERE id = 8")
        .execute(&ctx.pool)
        .await
        .unwrap();

    let lines = ctx.orders.lines_for_order(&result.order_id).await.unwrap();
    assert_eq!(lines[0].unit_price_cents, 1000);

    // 视图里的小计也用定格价
    let view = ctx
        .queries
        .order_detail(&result.order_id, USER)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.lines[0].subtotal_cents, 2000);
    assert_eq!(view.total_pay_cents, 2000 + TRANSIT_PRICE_CENTS);
}

/// 只清除已提交的条目，未提交的保留
#[tokio::test]
async fn eviction_spares_uncommitted_entries() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 1, 1000, 5).await;
    seed_sku(&ctx.pool, 2, 2000, 5).await;
    seed_address(&ctx.pool, ADDR, USER).await;

    ctx.cart.add(USER, 1, 1).await.unwrap();
    ctx.cart.add(USER, 2, 2).await.unwrap();

    ctx.engine
        .commit(USER, ADDR, PayMethod::Gateway, &[1])
        .await
        .unwrap();

    assert_eq!(ctx.cart.quantity(USER, 1).unwrap(), None);
    assert_eq!(ctx.cart.quantity(USER, 2).unwrap(), Some(2));
}

/// 地址必须属于下单用户
#[tokio::test]
async fn foreign_address_is_rejected_before_transaction() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 1, 1000, 5).await;
    seed_address(&ctx.pool, 9, 999).await; // someone else's address

    ctx.cart.add(USER, 1, 1).await.unwrap();

    let err = ctx
        .engine
        .commit(USER, 9, PayMethod::Gateway, &[1])
        .await
        .unwrap_err();
    assert!(matches!(err, CommitError::InvalidAddress(9)));
    assert_eq!(order_count(&ctx.pool).await, 0);
    assert_eq!(sku_stock_sales(&ctx.pool, 1).await, (5, 0));
}

/// 下单预览：数量取自购物车，合计含运费
#[tokio::test]
async fn place_preview_reads_quantities_from_cart() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 1, 1000, 5).await;
    seed_sku(&ctx.pool, 2, 2000, 5).await;
    seed_address(&ctx.pool, ADDR, USER).await;

    ctx.cart.add(USER, 1, 2).await.unwrap();
    ctx.cart.add(USER, 2, 1).await.unwrap();

    let preview = ctx.engine.place(USER, &[1, 2]).await.unwrap();
    assert_eq!(preview.total_count, 3);
    assert_eq!(preview.total_price_cents, 4000);
    assert_eq!(preview.transit_price_cents, TRANSIT_PRICE_CENTS);
    assert_eq!(preview.total_pay_cents, 4000 + TRANSIT_PRICE_CENTS);
    assert_eq!(preview.sku_ids, "1,2");
    assert_eq!(preview.addresses.len(), 1);
    assert_eq!(preview.lines.len(), 2);

    // 预览不动库存，不清购物车
    assert_eq!(sku_stock_sales(&ctx.pool, 1).await, (5, 0));
    assert_eq!(ctx.cart.count(USER).unwrap(), 2);
}

/// 历史分页：每页 2 单，越界页回退到第 1 页
#[tokio::test]
async fn history_pagination_with_fallback() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 1, 1000, 50).await;
    seed_address(&ctx.pool, ADDR, USER).await;

    for _ in 0..3 {
        ctx.cart.add(USER, 1, 1).await.unwrap();
        ctx.engine
            .commit(USER, ADDR, PayMethod::Gateway, &[1])
            .await
            .unwrap();
        // order_id 以秒为粒度，隔开避免主键冲突
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    }

    let page1 = ctx.queries.history_page(USER, 1).await.unwrap();
    assert_eq!(page1.orders.len(), 2);
    assert_eq!(page1.num_pages, 2);
    assert_eq!(page1.pages, vec![1, 2]);

    let page2 = ctx.queries.history_page(USER, 2).await.unwrap();
    assert_eq!(page2.orders.len(), 1);

    let fallback = ctx.queries.history_page(USER, 9).await.unwrap();
    assert_eq!(fallback.page, 1);
    assert_eq!(fallback.orders.len(), 2);
}

/// 评论提交：写入订单行并将订单推进到已完成
#[tokio::test]
async fn comment_flow_completes_order() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 1, 1000, 5).await;
    seed_address(&ctx.pool, ADDR, USER).await;

    ctx.cart.add(USER, 1, 1).await.unwrap();
    let result = ctx
        .engine
        .commit(USER, ADDR, PayMethod::Gateway, &[1])
        .await
        .unwrap();

    // 支付确认后才能评价
    assert!(ctx.orders.mark_paid(&result.order_id, "trade-1").await.unwrap());
    // 重复确认是无害的空操作
    assert!(!ctx.orders.mark_paid(&result.order_id, "trade-2").await.unwrap());

    assert!(ctx
        .orders
        .set_line_comment(&result.order_id, 1, "很新鲜")
        .await
        .unwrap());
    assert!(ctx.orders.mark_completed(&result.order_id).await.unwrap());

    let view = ctx
        .queries
        .order_detail(&result.order_id, USER)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.status, OrderStatus::Completed);
    assert_eq!(view.trade_no.as_deref(), Some("trade-1"));
    assert_eq!(view.lines[0].comment.as_deref(), Some("很新鲜"));
}

/// 补货走同一条 CAS 路径
#[tokio::test]
async fn restock_goes_through_cas() {
    let ctx = setup().await;
    seed_sku(&ctx.pool, 1, 1000, 2).await;

    let sku = ctx.skus.restock(1, 5).await.unwrap();
    assert_eq!(sku.stock, 7);
    assert_eq!(sku.sales, 0);
}
