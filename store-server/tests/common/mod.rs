//! 集成测试共用脚手架
//!
//! 每个测试在独立的临时目录里建一套完整存储（SQLite + redb），
//! 通过仓库和引擎直接驱动，不经过 HTTP 层。

#![allow(dead_code)]

use store_server::cart::{CartStorage, CartStore};
use store_server::db::DbService;
use store_server::db::repository::{OrderRepository, SkuRepository};
use store_server::orders::{OrderCommitEngine, OrderQueryService};
use store_server::services::{OutboundTask, TaskQueue};
use tokio::sync::mpsc;

pub const TRANSIT_PRICE_CENTS: i64 = 1000;

pub struct TestCtx {
    pub pool: sqlx::SqlitePool,
    pub cart: CartStore,
    pub engine: OrderCommitEngine,
    pub orders: OrderRepository,
    pub skus: SkuRepository,
    pub queries: OrderQueryService,
    /// Keep the queue receiver alive so enqueues don't hit a closed channel
    pub task_rx: mpsc::UnboundedReceiver<OutboundTask>,
    _dir: tempfile::TempDir,
}

pub async fn setup() -> TestCtx {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = DbService::new(&dir.path().join("store.db").to_string_lossy())
        .await
        .expect("open sqlite");
    let storage = CartStorage::open(dir.path().join("cart.redb")).expect("open redb");

    let skus = SkuRepository::new(db.pool.clone());
    let orders = OrderRepository::new(db.pool.clone());
    let cart = CartStore::new(storage, skus.clone());
    let (task_queue, task_rx) = TaskQueue::new();
    let engine = OrderCommitEngine::new(
        db.pool.clone(),
        cart.clone(),
        task_queue,
        TRANSIT_PRICE_CENTS,
    );
    let queries = OrderQueryService::new(orders.clone(), skus.clone());

    TestCtx {
        pool: db.pool,
        cart,
        engine,
        orders,
        skus,
        queries,
        task_rx,
        _dir: dir,
    }
}

pub async fn seed_sku(pool: &sqlx::SqlitePool, id: i64, price_cents: i64, stock: i64) {
    sqlx::query(
        "INSERT INTO sku (id, name, unit, price_cents, stock, sales, spu_id, type_id, is_active) \
         VALUES (?, ?, '500g', ?, ?, 0, 1, 1, 1)",
    )
    .bind(id)
    .bind(format!("sku-{id}"))
    .bind(price_cents)
    .bind(stock)
    .execute(pool)
    .await
    .expect("seed sku");
}

pub async fn seed_address(pool: &sqlx::SqlitePool, id: i64, user_id: i64) {
    sqlx::query(
        "INSERT INTO address (id, user_id, receiver, addr, zip_code, phone, is_default) \
         VALUES (?, ?, 'receiver', 'No.1 Test Road', '100000', '13800000000', 1)",
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await
    .expect("seed address");
}

pub async fn sku_stock_sales(pool: &sqlx::SqlitePool, id: i64) -> (i64, i64) {
    sqlx::query_as("SELECT stock, sales FROM sku WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("read sku")
}

pub async fn order_count(pool: &sqlx::SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_info")
        .fetch_one(pool)
        .await
        .expect("count orders");
    count
}

pub async fn line_count(pool: &sqlx::SqlitePool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_line")
        .fetch_one(pool)
        .await
        .expect("count lines");
    count
}
