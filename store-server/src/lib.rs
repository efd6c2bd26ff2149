//! Store Server - 生鲜商城店面服务
//!
//! # 架构概述
//!
//! 本模块是店面服务的主入口，提供以下核心功能：
//!
//! - **订单提交引擎** (`orders`): 乐观并发库存扣减 + 全或无事务
//! - **购物车** (`cart`): redb 键值存储，会话级 sku → 数量哈希
//! - **数据库** (`db`): SQLite (sqlx)，订单/订单行/库存台账
//! - **支付对账** (`payment`): 网关轮询与订单状态流转
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 校验
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # SQLite 层（含库存台账 CAS）
//! ├── cart/          # 购物车 (redb)
//! ├── orders/        # 订单提交引擎与读路径
//! ├── payment/       # 支付网关与对账
//! ├── services/      # 出站任务队列、目录缓存
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod orders;
pub mod payment;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use cart::CartStore;
pub use core::{Config, Server, ServerState};
pub use orders::{OrderCommitEngine, OrderQueryService};
pub use payment::{PaymentGateway, PaymentReconciler};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_____  ________
  \__ \/ __/ __ \/ ___/ _ \
 ___/ / /_/ /_/ / /  /  __/
/____/\__/\____/_/   \___/
    "#
    );
}
