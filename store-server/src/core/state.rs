//! 服务器状态

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::auth::JwtService;
use crate::cart::{CartStorage, CartStore};
use crate::core::tasks::BackgroundTasks;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{OrderRepository, SkuRepository};
use crate::orders::{OrderCommitEngine, OrderQueryService};
use crate::payment::{HttpGateway, MockGateway, PaymentGateway};
use crate::services::{task_queue, CatalogCache, OutboundTask, TaskQueue};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | cart | CartStore | 购物车 (redb) |
/// | engine | OrderCommitEngine | 订单提交引擎 |
/// | order_queries | OrderQueryService | 订单读路径 |
/// | jwt_service | Arc<JwtService> | JWT 校验 |
/// | gateway | Arc<dyn PaymentGateway> | 支付网关 |
/// | catalog_cache | CatalogCache | 目录视图缓存 |
/// | task_queue | TaskQueue | 出站任务队列 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 数据库
    pub db: DbService,
    /// 购物车服务
    pub cart: CartStore,
    /// 订单提交引擎
    pub engine: OrderCommitEngine,
    /// 订单读路径
    pub order_queries: OrderQueryService,
    /// SKU 仓库
    pub skus: SkuRepository,
    /// 订单仓库
    pub orders: OrderRepository,
    /// JWT 校验服务
    pub jwt_service: Arc<JwtService>,
    /// 支付网关
    pub gateway: Arc<dyn PaymentGateway>,
    /// 目录视图缓存
    pub catalog_cache: CatalogCache,
    /// 出站任务队列
    pub task_queue: TaskQueue,
    /// 全局关闭令牌
    pub shutdown: CancellationToken,
    /// 出站队列接收端，启动后台任务时取走
    task_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<OutboundTask>>>>,
}

impl ServerState {
    /// 初始化所有服务
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db = DbService::new(&config.db_path().to_string_lossy()).await?;
        let storage = CartStorage::open(config.cart_db_path())
            .map_err(|e| AppError::internal(format!("Failed to open cart store: {e}")))?;

        let skus = SkuRepository::new(db.pool.clone());
        let orders = OrderRepository::new(db.pool.clone());
        let cart = CartStore::new(storage, skus.clone());

        let (task_queue, task_rx) = TaskQueue::new();
        let engine = OrderCommitEngine::new(
            db.pool.clone(),
            cart.clone(),
            task_queue.clone(),
            config.transit_price_cents,
        );
        let order_queries = OrderQueryService::new(orders.clone(), skus.clone());

        let gateway: Arc<dyn PaymentGateway> = match &config.gateway_url {
            Some(url) => Arc::new(HttpGateway::new(url.clone(), config.gateway_app_id.clone())),
            None => {
                tracing::warn!("GATEWAY_URL not set, using in-process mock gateway");
                Arc::new(MockGateway::succeed_after(1))
            }
        };

        Ok(Self {
            config: config.clone(),
            db,
            cart,
            engine,
            order_queries,
            skus,
            orders,
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            gateway,
            catalog_cache: CatalogCache::new(),
            task_queue,
            shutdown: CancellationToken::new(),
            task_rx: Arc::new(Mutex::new(Some(task_rx))),
        })
    }

    /// 启动后台任务并预热目录缓存
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new(self.shutdown.clone());

        if let Ok(mut guard) = self.task_rx.lock()
            && let Some(rx) = guard.take()
        {
            let cache = self.catalog_cache.clone();
            let skus = self.skus.clone();
            let token = self.shutdown.clone();
            tasks.spawn("outbound_queue", task_queue::run_worker(rx, cache, skus, token));
        }

        // 预热首页目录视图
        self.task_queue.enqueue(OutboundTask::RegenerateIndex);

        tasks
    }
}
