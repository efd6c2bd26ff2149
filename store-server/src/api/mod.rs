//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口（下单预览、提交、支付、查询、评论）
//! - [`skus`] - 商品读路径（目录、详情、浏览历史）

pub mod cart;
pub mod health;
pub mod orders;
pub mod skus;

use crate::core::ServerState;
use axum::Router;
use tower_http::trace::TraceLayer;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(skus::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
