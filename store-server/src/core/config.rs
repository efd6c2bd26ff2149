//! 服务器配置

use crate::auth::JwtConfig;
use std::path::PathBuf;

/// 服务器配置 - 店面节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/store | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TRANSIT_PRICE_CENTS | 1000 | 固定运费 (分) |
/// | PAY_POLL_INTERVAL_MS | 1000 | 支付查询轮询间隔 (毫秒) |
/// | PAY_POLL_MAX_ATTEMPTS | 120 | 支付查询最大次数 |
/// | GATEWAY_URL | (未设置) | 支付网关地址；未设置时使用 mock |
/// | GATEWAY_APP_ID | sandbox-app | 网关应用 id |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/store HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 固定运费 (分)，显示时加到实付款，不并入商品总价
    pub transit_price_cents: i64,
    /// 支付查询轮询间隔 (毫秒)
    pub pay_poll_interval_ms: u64,
    /// 支付查询最大次数
    pub pay_poll_max_attempts: u32,
    /// 支付网关地址；None 时使用进程内 mock
    pub gateway_url: Option<String>,
    /// 网关应用 id
    pub gateway_app_id: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/store".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            transit_price_cents: std::env::var("TRANSIT_PRICE_CENTS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1000),
            pay_poll_interval_ms: std::env::var("PAY_POLL_INTERVAL_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1000),
            pay_poll_max_attempts: std::env::var("PAY_POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(120),
            gateway_url: std::env::var("GATEWAY_URL").ok().filter(|s| !s.is_empty()),
            gateway_app_id: std::env::var("GATEWAY_APP_ID")
                .unwrap_or_else(|_| "sandbox-app".into()),
        }
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 订单数据库路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("store.db")
    }

    /// 购物车数据库路径
    pub fn cart_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("cart.redb")
    }
}
